use crate::error::UploadError;
use crate::manifest::AttributeManifest;
use particle_texture::ParticleTexture;

/// The effect or renderer that draws one particle family.
///
/// Textures are handed over by value; the loader keeps no copy. Upload,
/// shading and normalization of the attribute range are the renderer's
/// business, including ranges where `min == max`.
pub trait ParticleRenderer {
    /// Bind the four component position texture
    fn set_position_map(&mut self, texture: ParticleTexture) -> Result<(), UploadError>;

    /// Bind the scalar color texture of `attribute`, whose range, label and
    /// units drive the display
    fn set_color_map(
        &mut self,
        texture: ParticleTexture,
        attribute: &AttributeManifest,
    ) -> Result<(), UploadError>;

    /// Start playback with whatever maps have been set
    fn play(&mut self);
}

impl<R: ParticleRenderer + ?Sized> ParticleRenderer for Box<R> {
    fn set_position_map(&mut self, texture: ParticleTexture) -> Result<(), UploadError> {
        (**self).set_position_map(texture)
    }

    fn set_color_map(
        &mut self,
        texture: ParticleTexture,
        attribute: &AttributeManifest,
    ) -> Result<(), UploadError> {
        (**self).set_color_map(texture, attribute)
    }

    fn play(&mut self) {
        (**self).play();
    }
}
