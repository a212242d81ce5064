//! Client-array rendering strategy
//!
//! The fallback for contexts without vertex-array-object support. The
//! build's tables and index buffer are retained verbatim for the renderer's
//! lifetime; every draw sets transient client pointers into them for exactly
//! the channels the variant provides, draws, and clears the pointers again.
//! No GPU objects are ever created. Shaders are not consulted on this path;
//! it targets the fixed-function pipeline.

use crate::backend::traits::GlContext;
use crate::batch::{GeometryBatch, TextureGroup, VariantTables, VertexVariant};
use crate::renderer::RenderPipeline;
use crate::shading::VariantBinder;

/// CPU-resident strategy: per-draw client pointers into retained arrays.
#[derive(Debug, Default)]
pub struct ClientArrayPipeline {
    tables: VariantTables,
    indices: Vec<u16>,
}

impl ClientArrayPipeline {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: GlContext> RenderPipeline<C> for ClientArrayPipeline {
    fn upload(&mut self, _ctx: &mut C, batch: GeometryBatch) {
        self.tables = batch.tables;
        self.indices = batch.indices;
    }

    fn draw_group(
        &mut self,
        ctx: &mut C,
        _binder: Option<&mut dyn VariantBinder>,
        group: &TextureGroup,
    ) {
        for variant in VertexVariant::ALL {
            let range = group.range(variant);
            if range.is_empty() || self.tables.is_empty(variant) {
                continue;
            }

            let layout = variant.layout();
            let bytes = self.tables.bytes(variant);
            for attribute in &layout.attributes {
                ctx.enable_client_array(attribute.semantic);
            }
            for attribute in &layout.attributes {
                ctx.client_pointer(
                    attribute.semantic,
                    attribute.format,
                    layout.stride,
                    attribute.offset,
                    bytes,
                );
            }

            let start = range.start as usize * 3;
            let end = range.end as usize * 3;
            ctx.draw_indexed_slice(&self.indices[start..end]);

            for attribute in &layout.attributes {
                ctx.disable_client_array(attribute.semantic);
            }
        }
    }

    fn cleanup(&mut self, _ctx: &mut C) {
        self.tables.clear();
        self.indices.clear();
    }
}
