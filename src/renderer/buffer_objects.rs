//! Buffer-object rendering strategy
//!
//! One shared element buffer plus, per non-empty variant, one vertex buffer
//! and one vertex array object capturing the element binding and the
//! variant's attribute layout. CPU-side geometry is released as soon as the
//! upload returns; draws bind a vertex array and issue one indexed call per
//! variant range.

use crate::backend::traits::{BufferHandle, GlContext, VertexArrayHandle};
use crate::batch::{GeometryBatch, TextureGroup, VertexVariant, VARIANT_COUNT};
use crate::renderer::RenderPipeline;
use crate::shading::VariantBinder;

/// GPU-resident strategy: vertex arrays over static buffer objects.
#[derive(Debug, Default)]
pub struct BufferObjectPipeline {
    index_buffer: Option<BufferHandle>,
    vertex_buffers: [Option<BufferHandle>; VARIANT_COUNT],
    vertex_arrays: [Option<VertexArrayHandle>; VARIANT_COUNT],
}

impl BufferObjectPipeline {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: GlContext> RenderPipeline<C> for BufferObjectPipeline {
    fn upload(&mut self, ctx: &mut C, batch: GeometryBatch) {
        let index_buffer = ctx.create_buffer();
        ctx.bind_index_buffer(Some(index_buffer));
        ctx.upload_index_buffer(bytemuck::cast_slice(&batch.indices));
        self.index_buffer = Some(index_buffer);

        for variant in VertexVariant::ALL {
            if batch.triangles[variant.index()] == 0 {
                continue;
            }

            let array = ctx.create_vertex_array();
            ctx.bind_vertex_array(Some(array));
            for slot in (0..VARIANT_COUNT as u32).rev() {
                ctx.disable_attribute(slot);
            }
            // The element binding is captured by the bound vertex array.
            ctx.bind_index_buffer(Some(index_buffer));

            let buffer = ctx.create_buffer();
            ctx.bind_array_buffer(Some(buffer));
            ctx.upload_array_buffer(batch.tables.bytes(variant));

            let layout = variant.layout();
            for attribute in &layout.attributes {
                let slot = attribute.semantic.slot();
                ctx.enable_attribute(slot);
                ctx.attribute_pointer(slot, attribute.format, layout.stride, attribute.offset);
            }

            self.vertex_arrays[variant.index()] = Some(array);
            self.vertex_buffers[variant.index()] = Some(buffer);
        }

        ctx.bind_vertex_array(None);
        for slot in (0..VARIANT_COUNT as u32).rev() {
            ctx.disable_attribute(slot);
        }
        // `batch` drops here, releasing the CPU-side tables and indices.
    }

    fn draw_group(
        &mut self,
        ctx: &mut C,
        mut binder: Option<&mut dyn VariantBinder>,
        group: &TextureGroup,
    ) {
        for variant in VertexVariant::ALL {
            let range = group.range(variant);
            if range.is_empty() {
                continue;
            }
            let Some(array) = self.vertex_arrays[variant.index()] else {
                continue;
            };
            if let Some(binder) = binder.as_mut() {
                if !binder.bind_variant(variant) {
                    continue;
                }
            }
            ctx.bind_vertex_array(Some(array));
            ctx.draw_indexed(range.start * 3..range.end * 3);
        }
    }

    fn cleanup(&mut self, ctx: &mut C) {
        for slot in (0..VARIANT_COUNT as u32).rev() {
            ctx.disable_attribute(slot);
        }
        ctx.bind_array_buffer(None);
        ctx.bind_index_buffer(None);
        if let Some(buffer) = self.index_buffer.take() {
            ctx.delete_buffer(buffer);
        }
        ctx.bind_vertex_array(None);
        for index in 0..VARIANT_COUNT {
            if let Some(array) = self.vertex_arrays[index].take() {
                ctx.delete_vertex_array(array);
            }
            if let Some(buffer) = self.vertex_buffers[index].take() {
                ctx.delete_buffer(buffer);
            }
        }
    }
}
