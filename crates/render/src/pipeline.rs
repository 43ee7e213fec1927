use spindle_common::Diagnostic;

/// Errors from building a shader program. Both stages are terminal: the
/// caller reports the diagnostic and shuts down.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("shader compilation failed: {0}")]
    Compile(Diagnostic),
    #[error("program link failed: {0}")]
    Link(Diagnostic),
}

/// Everything needed to turn one WGSL module into a render pipeline.
pub struct PipelineConfig<'a> {
    pub label: &'a str,
    pub source: &'a str,
    pub vertex_layouts: &'a [wgpu::VertexBufferLayout<'a>],
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub surface_format: wgpu::TextureFormat,
    pub depth: bool,
}

/// A compiled and linked render pipeline.
///
/// Module validation ("compile") and pipeline creation ("link") each run
/// inside a wgpu validation error scope, so a malformed shader surfaces as a
/// [`ShaderError`] with the driver's diagnostic instead of an uncaptured
/// device error.
pub struct ShaderProgram {
    pub pipeline: wgpu::RenderPipeline,
}

impl ShaderProgram {
    pub fn build(
        device: &wgpu::Device,
        config: &PipelineConfig<'_>,
    ) -> Result<Self, ShaderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(config.label),
            source: wgpu::ShaderSource::Wgsl(config.source.into()),
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Compile(Diagnostic::new(err.to_string())));
        }

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(config.label),
            bind_group_layouts: config.bind_group_layouts,
            push_constant_ranges: &[],
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(config.label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: config.vertex_layouts,
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: config.depth.then(|| wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link(Diagnostic::new(err.to_string())));
        }

        Ok(Self { pipeline })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_displays_its_stage_and_diagnostic() {
        let err = ShaderError::Compile(Diagnostic::new("unknown identifier 'foo'"));
        let text = err.to_string();
        assert!(text.contains("compilation failed"));
        assert!(text.contains("unknown identifier"));
    }

    #[test]
    fn link_error_carries_capped_diagnostic() {
        let err = ShaderError::Link(Diagnostic::new("e".repeat(4096)));
        match err {
            ShaderError::Link(d) => assert_eq!(d.as_str().len(), 511),
            ShaderError::Compile(_) => unreachable!(),
        }
    }
}
