//! Catch the Star -- window, render loop and entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Key events are
//! forwarded to the session as W3C code strings the moment they arrive; each
//! `RedrawRequested` runs exactly one session tick against the current
//! surface size, then:
//!
//!   1. rebuild the sprite batch from the world
//!   2. upload the batch and camera uniform
//!   3. draw sprites, then composite the egui HUD
//!
//! `--replay <script.json>` runs a script headless instead and logs the outcome.

mod assets;
mod audio;
mod draw;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use assets::{load_textures, probe_catalog, GpuSpriteTexture};
use catch_core::config::load_config_or_default;
use catch_core::replay::{load_replay_from_path, ReplayOutcome};
use catch_core::{Collaborators, FrameClock, GameConfig, GameSession};
use catch_hud::{DebugStats, HudOverlay, TextSlot};
use catch_platform::{physical_key_code, PlatformConfig};
use catch_render::{GpuContext, MeshBuffers, ScreenCamera, SpriteBatch, SpritePipeline};

const CONFIG_PATH: &str = "assets/config/game.json";

struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    clock: FrameClock,
    camera: ScreenCamera,
    sprite_pipeline: SpritePipeline,
    hud: HudOverlay,
    session: GameSession<StdRng>,
    textures: HashMap<Arc<str>, GpuSpriteTexture>,

    batch: SpriteBatch,
    mesh: MeshBuffers,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
}

impl EngineState {
    fn new(window: Arc<Window>, config: &GameConfig) -> Result<Self, String> {
        let gpu = GpuContext::new(window.clone())?;
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let loaded = load_textures(&gpu.device, &gpu.queue, &sprite_pipeline, config)?;

        let score_text = TextSlot::new();
        let tutorial_text = TextSlot::new();
        let collaborators = Collaborators {
            score_text: Box::new(score_text.clone()),
            tutorial_text: Box::new(tutorial_text.clone()),
            audio: audio::load_audio_bank(&config.audio),
        };
        let session = GameSession::new(
            config,
            &loaded.catalog,
            collaborators,
            gpu.viewport(),
            StdRng::from_entropy(),
        )?;

        let hud = HudOverlay::new(
            &gpu.device,
            gpu.surface_format,
            &window,
            score_text,
            tutorial_text,
        );

        let camera = ScreenCamera::new(gpu.size.0, gpu.size.1);
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[camera.build_uniform()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let mesh = MeshBuffers::new(&gpu.device);

        Ok(Self {
            window,
            gpu,
            clock: FrameClock::new(),
            camera,
            sprite_pipeline,
            hud,
            session,
            textures: loaded.gpu,
            batch: SpriteBatch::new(),
            mesh,
            camera_buffer,
            camera_bind_group,
        })
    }

    fn debug_stats(&self) -> DebugStats {
        let world = self.session.world();
        DebugStats {
            ticks: self.session.ticks(),
            score: self.session.score(),
            player_position: world.player.sprite.position,
            player_velocity: world.player.motion.velocity,
            cosmetic_label: self.session.cosmetic_mode().label().to_string(),
            sprite_count: self.batch.quad_count() as u32,
            draw_calls: self.batch.draw_calls.len() as u32,
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &winit::event::KeyEvent) {
        let pressed = event.state == ElementState::Pressed;
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Escape) if pressed => {
                log::info!("Escape pressed, exiting.");
                self.session.shutdown();
                event_loop.exit();
                return;
            }
            PhysicalKey::Code(KeyCode::F3) => {
                if pressed && !event.repeat {
                    self.hud.toggle_debug();
                }
                return;
            }
            _ => {}
        }

        let Some(code) = physical_key_code(event.physical_key) else {
            return;
        };
        if pressed {
            self.session.key_down(&code);
        } else {
            self.session.key_up(&code);
        }
    }

    fn redraw(&mut self) {
        self.clock.begin_frame();
        let report = self.session.tick(self.gpu.viewport());
        if report.scored {
            log::debug!("Tick {}: score {}", report.tick, report.score);
        }

        draw::build_batch(self.session.world(), &mut self.batch);
        self.mesh
            .upload(&self.gpu.device, &self.gpu.queue, &self.batch);
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera.build_uniform()]),
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let stats = self.debug_stats();
        let (egui_primitives, egui_textures_delta) =
            self.hud.prepare(&self.window, &self.clock, &stats);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sprite Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for draw in &self.batch.draw_calls {
                if let Some(texture) = self.textures.get(&draw.texture_key) {
                    render_pass.set_bind_group(1, &texture.bind_group, &[]);
                    render_pass.draw_indexed(
                        draw.index_start..(draw.index_start + draw.index_count),
                        0,
                        0..1,
                    );
                }
            }
        }

        self.hud.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("HUD Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.hud
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.hud.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct App {
    platform: PlatformConfig,
    config: GameConfig,
    state: Option<EngineState>,
}

impl App {
    fn new(config: GameConfig) -> Self {
        Self {
            platform: PlatformConfig::default(),
            config,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let started = catch_platform::create_window(event_loop, &self.platform)
            .and_then(|window| EngineState::new(window, &self.config));
        match started {
            Ok(state) => self.state = Some(state),
            Err(e) => {
                log::error!("Failed to start: {e}");
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state.hud.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                state.session.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.camera.viewport = (w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                state.handle_key(event_loop, &event);
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }
                state.redraw();
            }

            _ => {}
        }
    }
}

#[derive(Debug, PartialEq)]
struct CliArgs {
    config: PathBuf,
    replay: Option<PathBuf>,
    seed: u64,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut parsed = CliArgs {
        config: PathBuf::from(CONFIG_PATH),
        replay: None,
        seed: 0,
    };
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| format!("Missing value for {flag}"))
        };
        match arg.as_str() {
            "--config" => parsed.config = PathBuf::from(value("--config")?),
            "--replay" => parsed.replay = Some(PathBuf::from(value("--replay")?)),
            "--seed" => {
                let raw = value("--seed")?;
                parsed.seed = raw
                    .parse()
                    .map_err(|e| format!("Invalid --seed '{raw}': {e}"))?;
            }
            other => return Err(format!("Unknown argument '{other}'")),
        }
    }
    Ok(parsed)
}

fn run_replay(config: &GameConfig, path: &Path, seed: u64) -> Result<ReplayOutcome, String> {
    let script = load_replay_from_path(path)?;
    let catalog = probe_catalog(config)?;
    let mut session = GameSession::new(
        config,
        &catalog,
        Collaborators::silent(),
        script.viewport(),
        StdRng::seed_from_u64(seed),
    )?;
    let outcome = script.run(&mut session);
    session.shutdown();
    Ok(outcome)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            log::error!("Usage: catch_game [--config <path>] [--replay <script.json> [--seed <n>]]");
            std::process::exit(2);
        }
    };
    let config = match load_config_or_default(&args.config) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    if let Some(path) = &args.replay {
        match run_replay(&config, path, args.seed) {
            Ok(outcome) => log::info!(
                "Replay finished: {} ticks, score {}, scoring ticks {:?}, player at ({}, {})",
                outcome.ticks,
                outcome.score,
                outcome.scoring_ticks,
                outcome.final_position.x,
                outcome.final_position.y
            ),
            Err(e) => {
                log::error!("Replay failed: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    log::info!("Catch the Star starting...");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_use_default_config() {
        let parsed = parse_args(Vec::new()).expect("empty args parse");
        assert_eq!(parsed.config, PathBuf::from(CONFIG_PATH));
        assert_eq!(parsed.replay, None);
        assert_eq!(parsed.seed, 0);
    }

    #[test]
    fn replay_flags_parse() {
        let parsed = parse_args(args(&["--replay", "run.json", "--seed", "7", "--config", "c.json"]))
            .expect("flags parse");
        assert_eq!(parsed.replay, Some(PathBuf::from("run.json")));
        assert_eq!(parsed.seed, 7);
        assert_eq!(parsed.config, PathBuf::from("c.json"));
    }

    #[test]
    fn shipped_replay_runs_headless() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let config = GameConfig {
            textures_dir: root.join("assets/textures"),
            ..GameConfig::default()
        };
        let replay = root.join("assets/replays/sweep.json");
        let first = run_replay(&config, &replay, 3).expect("replay runs");
        let second = run_replay(&config, &replay, 3).expect("replay runs");
        assert_eq!(first.ticks, 311);
        assert_eq!(first, second);
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert!(parse_args(args(&["--seed"]))
            .expect_err("missing value")
            .contains("Missing value for --seed"));
        assert!(parse_args(args(&["--seed", "x"]))
            .expect_err("not a number")
            .contains("Invalid --seed"));
        assert!(parse_args(args(&["--fast"]))
            .expect_err("unknown flag")
            .contains("Unknown argument"));
    }
}
