use bytemuck::{Pod, Zeroable};

pub const BLIT_SOURCE: &str = include_str!("blit.wgsl");

/// Uniforms of the blit pass.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BlitUniforms {
    /// Clip-space scale that letterboxes the canvas inside the window.
    pub scale: [f32; 2],
    pub _padding: [f32; 2],
}

impl BlitUniforms {
    /// Scale that fits a `canvas` sized image inside a `window` sized
    /// surface without distorting it.
    pub fn letterbox(canvas: (u32, u32), window: (u32, u32)) -> Self {
        let canvas_aspect = canvas.0.max(1) as f32 / canvas.1.max(1) as f32;
        let window_aspect = window.0.max(1) as f32 / window.1.max(1) as f32;
        let scale = if window_aspect > canvas_aspect {
            [canvas_aspect / window_aspect, 1.0]
        } else {
            [1.0, window_aspect / canvas_aspect]
        };
        Self {
            scale,
            _padding: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letterbox_square_canvas() {
        assert_eq!(BlitUniforms::letterbox((1920, 1920), (800, 800)).scale, [1.0, 1.0]);
        assert_eq!(BlitUniforms::letterbox((1920, 1920), (1600, 800)).scale, [0.5, 1.0]);
        assert_eq!(BlitUniforms::letterbox((1920, 1920), (800, 1600)).scale, [1.0, 0.5]);
    }

    #[test]
    fn test_uniforms_are_16_bytes() {
        assert_eq!(std::mem::size_of::<BlitUniforms>(), 16);
    }
}
