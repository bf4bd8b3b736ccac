use crate::hittable::HitRecord;
use crate::material::{Material, ScatterRecord};
use crate::pdf::CosinePdf;
use crate::ray::Ray;
use crate::texture::{ImageTexture, Texture};
use std::f32::consts::PI;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use utils::{Color, Point3};

/// Material for OBJ meshes: a Lambertian over the `map_Kd` diffuse texture
/// named by the mesh's `.mtl` file, optionally forced into a fuzzy metal.
pub struct WavefrontMaterial {
    albedo: Arc<dyn Texture>,
    make_metal: bool,
    fuzz: f32,
}

impl WavefrontMaterial {
    /// Parse `map_Kd` out of a material file. The texture path resolves
    /// relative to the material file's directory; a missing or unreadable
    /// map falls back to plain white.
    pub fn from_mtl_file<P: AsRef<Path>>(path: P, make_metal: bool, fuzz: f32) -> WavefrontMaterial {
        let path = path.as_ref();
        let mut albedo: Option<Arc<dyn Texture>> = None;

        match fs::read_to_string(path) {
            Ok(contents) => {
                for line in contents.lines() {
                    if let Some(rest) = line.strip_prefix("map_Kd") {
                        let filename = rest.trim();
                        if !filename.is_empty() {
                            let parent = path.parent().unwrap_or_else(|| Path::new("."));
                            let map: Arc<dyn Texture> =
                                ImageTexture::from_file(parent.join(filename));
                            albedo = Some(map);
                        }
                    }
                }
                if albedo.is_none() {
                    debug!(path = %path.display(), "no diffuse map in material file, using white");
                }
            }
            Err(err) => {
                debug!(path = %path.display(), %err, "could not open material file");
            }
        }

        WavefrontMaterial {
            albedo: albedo.unwrap_or_else(|| ImageTexture::from_file("runtimedata/white.png")),
            make_metal,
            fuzz,
        }
    }

    pub fn from_texture(albedo: Arc<dyn Texture>, make_metal: bool, fuzz: f32) -> WavefrontMaterial {
        WavefrontMaterial {
            albedo,
            make_metal,
            fuzz,
        }
    }
}

impl Material for WavefrontMaterial {
    fn scatter(&self, ray_in: &Ray, hit: &HitRecord) -> Option<ScatterRecord> {
        let attenuation = self.albedo.value(hit.u, hit.v, hit.p);
        if self.make_metal {
            let reflected = utils::reflect(ray_in.direction().normalize(), hit.normal);
            Some(ScatterRecord::Specular {
                ray: Ray::with_time(
                    hit.p,
                    reflected + self.fuzz * utils::random_in_unit_sphere(),
                    ray_in.time(),
                ),
                attenuation,
            })
        } else {
            let target = hit.p + hit.normal + utils::random_in_unit_sphere();
            Some(ScatterRecord::Diffuse {
                attenuation,
                pdf: Box::new(CosinePdf::new(hit.normal)),
                classic: Ray::with_time(hit.p, target - hit.p, ray_in.time()),
            })
        }
    }

    fn scattering_pdf(&self, _ray_in: &Ray, hit: &HitRecord, scattered: &Ray) -> f32 {
        let cosine = hit.normal.dot(scattered.direction().normalize());
        if cosine < 0.0 {
            0.0
        } else {
            (cosine / PI).max(0.05)
        }
    }

    fn albedo(&self, u: f32, v: f32, p: Point3) -> Color {
        self.albedo.value(u, v, p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_material_file_still_yields_white() {
        let mat = WavefrontMaterial::from_mtl_file("no/such/file.mtl", false, 0.5);
        assert_eq!(mat.albedo(0.5, 0.5, Point3::ZERO), Color::ONE);
    }

    #[test]
    fn map_kd_pointing_nowhere_falls_back_to_white() {
        let dir = std::env::temp_dir();
        let mtl_path = dir.join("aurora_wavefront_test.mtl");
        let mut f = fs::File::create(&mtl_path).unwrap();
        writeln!(f, "newmtl body").unwrap();
        writeln!(f, "map_Kd missing_texture.png").unwrap();
        drop(f);

        let mat = WavefrontMaterial::from_mtl_file(&mtl_path, false, 0.5);
        assert_eq!(mat.albedo(0.1, 0.9, Point3::ZERO), Color::ONE);
        let _ = fs::remove_file(&mtl_path);
    }
}
