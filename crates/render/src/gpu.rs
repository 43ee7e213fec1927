use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use spindle_common::Viewport;
use wgpu::util::DeviceExt;

use crate::mesh::{self, FlatVertex, TexturedVertex};
use crate::pipeline::{PipelineConfig, ShaderError, ShaderProgram};
use crate::shaders;
use crate::texture::{CpuImage, GpuTexture};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniforms {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CubeInstance {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
}

impl CubeInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn from_mat4(model: Mat4) -> Self {
        let cols = model.to_cols_array_2d();
        Self {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SpinUniforms {
    transform: [[f32; 4]; 4],
}

/// World positions of the ten cubes.
pub const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

/// Spin rate of the first cube in degrees per second; cube `i` spins at
/// `(i + 1)` times this rate.
const SPIN_RATE_DEGREES: f32 = -70.0;

const SPIN_AXIS: Vec3 = Vec3::new(1.0, 0.5, 0.0);

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

/// Model matrix for cube `index` after `elapsed_seconds` of wall time:
/// translation to its fixed position composed with an ever-growing rotation
/// about a tilted axis.
pub fn cube_model_matrix(index: usize, elapsed_seconds: f32) -> Mat4 {
    let angle = (SPIN_RATE_DEGREES * (index + 1) as f32).to_radians() * elapsed_seconds;
    Mat4::from_translation(CUBE_POSITIONS[index])
        * Mat4::from_axis_angle(SPIN_AXIS.normalize(), angle)
}

fn create_depth_texture(device: &wgpu::Device, viewport: Viewport) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: viewport.width(),
            height: viewport.height(),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

fn camera_bind_group(
    device: &wgpu::Device,
    buffer: &wgpu::Buffer,
) -> (wgpu::BindGroupLayout, wgpu::BindGroup) {
    let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("uniform_bind_group_layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("uniform_bind_group"),
        layout: &layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    (layout, bind_group)
}

/// Renderer for the cube demo: ten textured cubes, depth-tested, one
/// instanced draw per frame.
pub struct CubeRenderer {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    texture: GpuTexture,
    depth_view: wgpu::TextureView,
}

impl CubeRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
        image: &CpuImage,
    ) -> Result<Self, ShaderError> {
        let texture = GpuTexture::upload(device, queue, image);

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::bytes_of(&CameraUniforms {
                view: Mat4::IDENTITY.to_cols_array_2d(),
                projection: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let (camera_layout, camera_bind_group) = camera_bind_group(device, &camera_buffer);

        let program = ShaderProgram::build(
            device,
            &PipelineConfig {
                label: "cube_pipeline",
                source: shaders::CUBE_SHADER,
                vertex_layouts: &[TexturedVertex::layout(), CubeInstance::layout()],
                bind_group_layouts: &[&camera_layout, &texture.bind_group_layout],
                surface_format,
                depth: true,
            },
        )?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&mesh::CUBE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cube_instance_buffer"),
            size: (CUBE_POSITIONS.len() * std::mem::size_of::<CubeInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let depth_view = create_depth_texture(device, viewport);

        Ok(Self {
            pipeline: program.pipeline,
            camera_buffer,
            camera_bind_group,
            vertex_buffer,
            instance_buffer,
            texture,
            depth_view,
        })
    }

    /// Recreate the depth attachment to match a resized surface.
    pub fn resize(&mut self, device: &wgpu::Device, viewport: Viewport) {
        self.depth_view = create_depth_texture(device, viewport);
    }

    /// Render one frame: clear color and depth, then draw all cubes with
    /// model matrices recomputed from elapsed wall time.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        view: Mat4,
        projection: Mat4,
        elapsed_seconds: f32,
    ) {
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniforms {
                view: view.to_cols_array_2d(),
                projection: projection.to_cols_array_2d(),
            }),
        );

        let instances: Vec<CubeInstance> = (0..CUBE_POSITIONS.len())
            .map(|i| CubeInstance::from_mat4(cube_model_matrix(i, elapsed_seconds)))
            .collect();
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("cube_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cube_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.camera_bind_group, &[]);
            pass.set_bind_group(1, &self.texture.bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            pass.draw(
                0..mesh::CUBE_VERTICES.len() as u32,
                0..CUBE_POSITIONS.len() as u32,
            );
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

/// Renderer for the triangle demo: one textured triangle under a single
/// accumulated transform, no depth buffer.
pub struct SpinRenderer {
    pipeline: wgpu::RenderPipeline,
    transform_buffer: wgpu::Buffer,
    transform_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    texture: GpuTexture,
}

impl SpinRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        image: &CpuImage,
    ) -> Result<Self, ShaderError> {
        let texture = GpuTexture::upload(device, queue, image);

        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("spin_transform_buffer"),
            contents: bytemuck::bytes_of(&SpinUniforms {
                transform: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let (transform_layout, transform_bind_group) = camera_bind_group(device, &transform_buffer);

        let program = ShaderProgram::build(
            device,
            &PipelineConfig {
                label: "spin_pipeline",
                source: shaders::SPIN_SHADER,
                vertex_layouts: &[FlatVertex::layout()],
                bind_group_layouts: &[&transform_layout, &texture.bind_group_layout],
                surface_format,
                depth: false,
            },
        )?;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("triangle_vertex_buffer"),
            contents: bytemuck::cast_slice(&mesh::TRIANGLE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(Self {
            pipeline: program.pipeline,
            transform_buffer,
            transform_bind_group,
            vertex_buffer,
            texture,
        })
    }

    /// Render one frame with the given accumulated transform.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        transform: Mat4,
    ) {
        queue.write_buffer(
            &self.transform_buffer,
            0,
            bytemuck::bytes_of(&SpinUniforms {
                transform: transform.to_cols_array_2d(),
            }),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("spin_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("spin_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.transform_bind_group, &[]);
            pass.set_bind_group(1, &self.texture.bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.draw(0..mesh::TRIANGLE_VERTICES.len() as u32, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_matrix_at_time_zero_is_pure_translation() {
        for (i, position) in CUBE_POSITIONS.iter().enumerate() {
            let model = cube_model_matrix(i, 0.0);
            let expected = Mat4::from_translation(*position);
            for (a, b) in model
                .to_cols_array()
                .iter()
                .zip(expected.to_cols_array().iter())
            {
                assert!((a - b).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn model_matrix_keeps_its_translation_while_spinning() {
        let model = cube_model_matrix(3, 12.5);
        let position = CUBE_POSITIONS[3];
        assert!((model.w_axis.x - position.x).abs() < 1e-5);
        assert!((model.w_axis.y - position.y).abs() < 1e-5);
        assert!((model.w_axis.z - position.z).abs() < 1e-5);
    }

    #[test]
    fn later_cubes_spin_faster() {
        // After the same elapsed time, cube 9's rotation angle is 10x cube
        // 0's; compare the rotation applied to a probe vector.
        let elapsed = 0.001;
        let probe = Vec3::new(0.0, 1.0, 0.0);
        let slow = (cube_model_matrix(0, elapsed).transform_vector3(probe) - probe).length();
        let fast = (cube_model_matrix(9, elapsed).transform_vector3(probe) - probe).length();
        assert!(fast > slow * 5.0);
    }

    #[test]
    fn instance_columns_round_trip_the_matrix() {
        let model = cube_model_matrix(5, 3.0);
        let instance = CubeInstance::from_mat4(model);
        let rebuilt = Mat4::from_cols_array_2d(&[
            instance.model_0,
            instance.model_1,
            instance.model_2,
            instance.model_3,
        ]);
        assert_eq!(model.to_cols_array(), rebuilt.to_cols_array());
    }

    #[test]
    fn instance_stride_matches_four_vec4_columns() {
        assert_eq!(std::mem::size_of::<CubeInstance>(), 64);
        assert_eq!(CubeInstance::layout().array_stride, 64);
    }
}
