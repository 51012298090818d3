use wgpu::RenderPass;

use crate::render::common::RenderCommon;

pub(crate) trait Pass {
    type TextureViews;

    fn create(device: &wgpu::Device, common: &RenderCommon) -> anyhow::Result<Self>
    where
        Self: Sized;

    fn render<'a, F>(
        &self,
        texture_views: &Self::TextureViews,
        encoder: &mut wgpu::CommandEncoder,
        common: &RenderCommon,
        render_callback: F,
    ) where
        F: FnOnce(&mut RenderPass) + 'a;
}
