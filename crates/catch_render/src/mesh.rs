//! CPU-side sprite batching and the GPU buffers it streams into.
//!
//! The batch is rebuilt every frame. Consecutive quads that share a texture
//! collapse into one draw call. GPU buffers grow to the next power of two and
//! never shrink.

use std::sync::Arc;

use glam::Vec2;

use crate::vertex::SpriteVertex;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub texture_key: Arc<str>,
    pub index_start: u32,
    pub index_count: u32,
}

pub struct QuadSpec<'a> {
    pub texture_key: &'a str,
    pub center: Vec2,
    pub size: Vec2,
    /// Flip the texture horizontally.
    pub mirrored: bool,
    pub color: [f32; 4],
}

#[derive(Debug, Default)]
pub struct SpriteBatch {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Screen space, y down: the first vertex is the top-left corner.
    pub fn push_quad(&mut self, spec: QuadSpec<'_>) {
        let half = spec.size * 0.5;
        let (u0, u1) = if spec.mirrored { (1.0, 0.0) } else { (0.0, 1.0) };
        let base_index = self.vertices.len() as u32;

        let corners = [
            (Vec2::new(-half.x, -half.y), [u0, 0.0]),
            (Vec2::new(half.x, -half.y), [u1, 0.0]),
            (Vec2::new(half.x, half.y), [u1, 1.0]),
            (Vec2::new(-half.x, half.y), [u0, 1.0]),
        ];
        for (offset, tex_coords) in corners {
            let position = spec.center + offset;
            self.vertices.push(SpriteVertex {
                position: position.to_array(),
                tex_coords,
                color: spec.color,
            });
        }

        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);

        self.push_draw_call(Arc::from(spec.texture_key), draw_start, 6);
    }

    fn push_draw_call(&mut self, texture_key: Arc<str>, index_start: u32, index_count: u32) {
        if let Some(last) = self.draw_calls.last_mut() {
            let contiguous = last.index_start + last.index_count == index_start;
            if *last.texture_key == *texture_key && contiguous {
                last.index_count += index_count;
                return;
            }
        }
        self.draw_calls.push(DrawCall {
            texture_key,
            index_start,
            index_count,
        });
    }
}

pub struct MeshBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,
}

impl MeshBuffers {
    pub fn new(device: &wgpu::Device) -> Self {
        let vertex_capacity = 16;
        let index_capacity = 32;
        Self {
            vertex_buffer: create_vertex_buffer(device, vertex_capacity),
            index_buffer: create_index_buffer(device, index_capacity),
            vertex_capacity,
            index_capacity,
        }
    }

    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, batch: &SpriteBatch) {
        let needed_vertices = batch.vertices.len().max(1);
        if needed_vertices > self.vertex_capacity {
            self.vertex_capacity = grown_capacity(needed_vertices);
            self.vertex_buffer = create_vertex_buffer(device, self.vertex_capacity);
        }
        let needed_indices = batch.indices.len().max(1);
        if needed_indices > self.index_capacity {
            self.index_capacity = grown_capacity(needed_indices);
            self.index_buffer = create_index_buffer(device, self.index_capacity);
        }

        if !batch.vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&batch.vertices));
        }
        if !batch.indices.is_empty() {
            queue.write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&batch.indices));
        }
    }
}

fn grown_capacity(needed: usize) -> usize {
    needed.next_power_of_two()
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
