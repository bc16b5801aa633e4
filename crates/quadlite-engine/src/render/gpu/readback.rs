//! Texture readback into tightly packed RGBA8 rows.

use std::sync::mpsc::channel;

use crate::render::RenderError;

const BYTES_PER_PIXEL: u32 = 4;

/// Row pitch of the staging buffer: wgpu requires copies to use a multiple
/// of `COPY_BYTES_PER_ROW_ALIGNMENT`.
pub(super) fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Copies `texture` to the CPU. Rows come back top-down.
pub(super) fn read_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, RenderError> {
    let padded_bpr = padded_bytes_per_row(width);
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("quadlite readback"),
        size: u64::from(padded_bpr) * u64::from(height),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("quadlite readback encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_bpr),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let slice = buffer.slice(..);
    let (sender, receiver) = channel();
    slice.map_async(wgpu::MapMode::Read, move |res| {
        let _ = sender.send(res);
    });
    device
        .poll(wgpu::PollType::wait_indefinitely())
        .map_err(|e| RenderError::Device(format!("readback poll failed: {e}")))?;
    receiver
        .recv()
        .map_err(|e| RenderError::Device(format!("readback callback dropped: {e}")))?
        .map_err(|e| RenderError::Device(format!("readback map failed: {e}")))?;

    let row_bytes = (width * BYTES_PER_PIXEL) as usize;
    let mapped = slice.get_mapped_range();
    let mut out = Vec::with_capacity(row_bytes * height as usize);
    for row in mapped.chunks(padded_bpr as usize).take(height as usize) {
        out.extend_from_slice(&row[..row_bytes]);
    }
    drop(mapped);
    buffer.unmap();

    Ok(out)
}

/// Swaps the red and blue channels in place.
pub(super) fn bgra_to_rgba(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}
