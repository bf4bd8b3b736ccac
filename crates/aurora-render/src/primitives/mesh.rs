use crate::aabb::Aabb;
use crate::bvh::BvhNode;
use crate::hittable::{HitRecord, Hittable};
use crate::material::{Lambertian, Material, WavefrontMaterial};
use crate::primitives::triangle::{Triangle, Vertex};
use crate::ray::Ray;
use crate::texture::ConstantTexture;
use obj::raw::object::Polygon;
use obj::raw::parse_obj;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use utils::{Color, Point3, Vec3A};

/// A triangle soup behind its own BVH.
pub struct TriMesh {
    bvh: Arc<BvhNode>,
    num_triangles: usize,
}

impl TriMesh {
    /// Binary STL: an ignored 80-byte header, a `u32` triangle count, then
    /// 50-byte records of one normal, three vertices, and an attribute
    /// word. The Z lane is negated for handedness; positions scale
    /// uniformly.
    pub fn from_stl_file<P: AsRef<Path>>(
        path: P,
        mat: Arc<dyn Material>,
        scale: f32,
    ) -> io::Result<TriMesh> {
        let mut bytes = Vec::new();
        File::open(path.as_ref())?.read_to_end(&mut bytes)?;

        if bytes.len() < 84 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "truncated STL header",
            ));
        }
        let num_triangles = u32::from_le_bytes(bytes[80..84].try_into().unwrap()) as usize;

        const RECORD: usize = 50;
        if bytes.len() < 84 + num_triangles * RECORD {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "truncated STL triangle data",
            ));
        }

        let read_point = |offset: usize| -> Point3 {
            let f = |i: usize| f32::from_le_bytes(bytes[offset + 4 * i..offset + 4 * i + 4].try_into().unwrap());
            Point3::new(f(0), f(1), -f(2)) * scale
        };

        let mut triangles: Vec<Arc<dyn Hittable>> = Vec::with_capacity(num_triangles);
        for i in 0..num_triangles {
            let base = 84 + i * RECORD;
            // Skip the record's face normal, keep the three vertices.
            let stl_vertex = |slot: usize| Vertex {
                position: read_point(base + 12 * (slot + 1)),
                normal: Vec3A::ZERO,
                color: Color::ONE,
                uv: [0.0, 0.0],
            };
            triangles.push(Arc::new(Triangle::new(
                stl_vertex(0),
                stl_vertex(1),
                stl_vertex(2),
                mat.clone(),
            )));
        }

        debug!(count = triangles.len(), "loaded STL mesh");
        Ok(TriMesh::from_triangles(triangles))
    }

    /// Wavefront OBJ. Triangles map one-to-one; quads split into
    /// `0,1,2` and `1,2,3`. Normals are unit-normalised on load, missing
    /// attributes default to zero, and `mtllib` resolves next to the OBJ
    /// into a [`WavefrontMaterial`] unless an override is supplied.
    pub fn from_obj_file<P: AsRef<Path>>(
        path: P,
        scale: f32,
        make_metal: bool,
        mat_override: Option<Arc<dyn Material>>,
    ) -> io::Result<TriMesh> {
        let path = path.as_ref();
        let input = BufReader::new(File::open(path)?);
        let raw = parse_obj(input)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;

        let mat: Arc<dyn Material> = match mat_override {
            Some(mat) => mat,
            None => match raw.material_libraries.first() {
                Some(lib) => {
                    let parent = path.parent().unwrap_or_else(|| Path::new("."));
                    Arc::new(WavefrontMaterial::from_mtl_file(
                        parent.join(lib),
                        make_metal,
                        0.5,
                    ))
                }
                None => Arc::new(Lambertian::new(Arc::new(ConstantTexture::new(Color::ONE)))),
            },
        };

        let position = |idx: usize| -> Point3 {
            let (x, y, z, _w) = raw.positions[idx];
            Point3::new(x, y, z) * scale
        };
        let normal = |idx: Option<usize>| -> Vec3A {
            idx.map(|i| {
                let (x, y, z) = raw.normals[i];
                Vec3A::new(x, y, z).normalize()
            })
            .unwrap_or(Vec3A::ZERO)
        };
        let tex_coord = |idx: Option<usize>| -> [f32; 2] {
            idx.map(|i| {
                let (u, v, _w) = raw.tex_coords[i];
                [u, v]
            })
            .unwrap_or([0.0, 0.0])
        };

        let mut triangles: Vec<Arc<dyn Hittable>> = Vec::new();
        for polygon in &raw.polygons {
            let corners: Vec<(usize, Option<usize>, Option<usize>)> = match polygon {
                Polygon::P(verts) => verts.iter().map(|&v| (v, None, None)).collect(),
                Polygon::PT(verts) => verts.iter().map(|&(v, t)| (v, Some(t), None)).collect(),
                Polygon::PN(verts) => verts.iter().map(|&(v, n)| (v, None, Some(n))).collect(),
                Polygon::PTN(verts) => verts
                    .iter()
                    .map(|&(v, t, n)| (v, Some(t), Some(n)))
                    .collect(),
            };
            if corners.len() < 3 {
                continue;
            }

            let build_vertex = |&(v, t, n): &(usize, Option<usize>, Option<usize>)| Vertex {
                position: position(v),
                normal: normal(n),
                color: Color::ZERO,
                uv: tex_coord(t),
            };

            triangles.push(Arc::new(Triangle::new(
                build_vertex(&corners[0]),
                build_vertex(&corners[1]),
                build_vertex(&corners[2]),
                mat.clone(),
            )));
            if corners.len() == 4 {
                triangles.push(Arc::new(Triangle::new(
                    build_vertex(&corners[1]),
                    build_vertex(&corners[2]),
                    build_vertex(&corners[3]),
                    mat.clone(),
                )));
            }
        }

        if triangles.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "OBJ file contains no faces",
            ));
        }

        debug!(count = triangles.len(), "loaded OBJ mesh");
        Ok(TriMesh::from_triangles(triangles))
    }

    fn from_triangles(triangles: Vec<Arc<dyn Hittable>>) -> TriMesh {
        let num_triangles = triangles.len();
        TriMesh {
            bvh: BvhNode::build(triangles, 0.0, 0.0),
            num_triangles,
        }
    }

    pub fn num_triangles(&self) -> usize {
        self.num_triangles
    }
}

impl Hittable for TriMesh {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        self.bvh.hit(ray, t_min, t_max)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.bvh.bounding_box(time0, time1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_material() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Arc::new(ConstantTexture::new(Color::ONE))))
    }

    fn write_temp(name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn stl_loads_with_negated_z_and_scale() {
        utils::seed_thread_rng(51);
        let mut bytes = vec![0u8; 80];
        bytes.extend_from_slice(&1u32.to_le_bytes());
        // One triangle in the z = -1 plane (stored as z = +1 in the file).
        let floats: [f32; 12] = [
            0.0, 0.0, 1.0, // normal
            0.0, 0.0, 1.0, // v0
            1.0, 0.0, 1.0, // v1
            0.0, 1.0, 1.0, // v2
        ];
        for f in floats {
            bytes.extend_from_slice(&f.to_le_bytes());
        }
        bytes.extend_from_slice(&0u16.to_le_bytes());

        let path = write_temp("aurora_mesh_test.stl", &bytes);
        let mesh = TriMesh::from_stl_file(&path, test_material(), 2.0).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(mesh.num_triangles(), 1);
        let bb = mesh.bounding_box(0.0, 1.0).unwrap();
        assert!((bb.minimum.z + 2.0).abs() < 1e-5);
        assert!((bb.maximum.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn obj_quads_split_into_two_triangles() {
        utils::seed_thread_rng(52);
        let obj = b"v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let path = write_temp("aurora_mesh_test.obj", obj);
        let mesh = TriMesh::from_obj_file(&path, 1.0, false, Some(test_material())).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(mesh.num_triangles(), 2);
    }

    #[test]
    fn obj_faces_intersect_where_expected() {
        utils::seed_thread_rng(53);
        let obj = b"v 0 0 0\nv 2 0 0\nv 0 2 0\nf 1 2 3\n";
        let path = write_temp("aurora_mesh_hit_test.obj", obj);
        let mesh = TriMesh::from_obj_file(&path, 1.0, false, Some(test_material())).unwrap();
        let _ = std::fs::remove_file(&path);

        let ray = Ray::new(Point3::new(0.5, 0.5, -4.0), Vec3A::new(0.0, 0.0, 1.0));
        let rec = mesh.hit(&ray, 0.001, f32::MAX).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-4);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(TriMesh::from_obj_file("no/such/mesh.obj", 1.0, false, None).is_err());
        assert!(TriMesh::from_stl_file("no/such/mesh.stl", test_material(), 1.0).is_err());
    }
}
