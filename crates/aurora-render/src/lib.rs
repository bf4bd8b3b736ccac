mod aabb;
mod buffer;
mod bvh;
mod camera;
mod hittable;
mod hittable_list;
mod instance;
mod material;
mod medium;
mod pdf;
mod perlin;
mod primitives;
mod ray;
mod scene;
mod scenes;
mod texture;
mod tracer;

pub mod image_out;

pub use aabb::Aabb;
pub use buffer::{FrameBuffer, rgba8};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable};
pub use hittable_list::HittableList;
pub use instance::{FlipNormals, RotateY, Translate};
pub use material::{
    Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterRecord,
    WavefrontMaterial,
};
pub use medium::ConstantMedium;
pub use pdf::{CosinePdf, MixturePdf, Pdf, ShapePdf};
pub use perlin::Perlin;
pub use primitives::{AxisRect, Cuboid, MovingSphere, Plane, Sphere, TriMesh, Triangle, Vertex};
pub use ray::Ray;
pub use scene::Scene;
pub use scenes::SampleScene;
pub use texture::{CheckerTexture, ConstantTexture, ImageTexture, NoiseTexture, Texture};
pub use tracer::{OnTraceComplete, RenderSettings, Renderer, Stats};
