mod sphere;
pub use sphere::Sphere;
mod moving_sphere;
pub use moving_sphere::MovingSphere;
mod rect;
pub use rect::{AxisRect, Plane};
mod cuboid;
pub use cuboid::Cuboid;
mod triangle;
pub use triangle::{Triangle, Vertex};
mod mesh;
pub use mesh::TriMesh;
