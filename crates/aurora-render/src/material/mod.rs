mod material;
pub use material::{Material, ScatterRecord};
mod lambertian;
pub use lambertian::Lambertian;
mod metal;
pub use metal::Metal;
mod dielectric;
pub use dielectric::Dielectric;
mod diffuse_light;
pub use diffuse_light::DiffuseLight;
mod isotropic;
pub use isotropic::Isotropic;
mod wavefront;
pub use wavefront::WavefrontMaterial;
