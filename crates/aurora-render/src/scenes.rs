use crate::bvh::BvhNode;
use crate::camera::Camera;
use crate::hittable::Hittable;
use crate::hittable_list::HittableList;
use crate::instance::{FlipNormals, RotateY, Translate};
use crate::material::{Dielectric, DiffuseLight, Lambertian, Metal};
use crate::medium::ConstantMedium;
use crate::perlin::Perlin;
use crate::primitives::{AxisRect, Cuboid, MovingSphere, Plane, Sphere, TriMesh};
use crate::scene::Scene;
use crate::texture::{CheckerTexture, ConstantTexture, ImageTexture, NoiseTexture};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;
use utils::{Color, Point3, Vec3A};

/// The bundled demonstration scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleScene {
    Random,
    Cornell,
    CornellSmoke,
    Mesh,
    Final,
}

impl SampleScene {
    pub const ALL: [SampleScene; 5] = [
        SampleScene::Random,
        SampleScene::Cornell,
        SampleScene::CornellSmoke,
        SampleScene::Mesh,
        SampleScene::Final,
    ];

    pub fn output_name(self) -> &'static str {
        match self {
            SampleScene::Random => "random",
            SampleScene::Cornell => "cornell1",
            SampleScene::CornellSmoke => "cornell2",
            SampleScene::Mesh => "mesh",
            SampleScene::Final => "final",
        }
    }

    pub fn build(self) -> Scene {
        match self {
            SampleScene::Random => random_scene(),
            SampleScene::Cornell => cornell_scene(false),
            SampleScene::CornellSmoke => cornell_scene(true),
            SampleScene::Mesh => mesh_scene(),
            SampleScene::Final => final_scene(),
        }
    }
}

fn camera_for(scene: SampleScene) -> Camera {
    let aspect = 1.0;
    match scene {
        SampleScene::Random => Camera::new(
            Point3::new(13.0, 2.0, 3.0),
            Point3::ZERO,
            Vec3A::Y,
            20.0,
            aspect,
            0.0,
            10.0,
            0.0,
            1.0,
            Color::new(0.7, 0.7, 0.7),
        ),
        SampleScene::Cornell | SampleScene::CornellSmoke => Camera::new(
            Point3::new(278.0, 278.0, -800.0),
            Point3::new(278.0, 278.0, 0.0),
            Vec3A::Y,
            40.0,
            aspect,
            0.0,
            10.0,
            0.0,
            1.0,
            Color::ZERO,
        ),
        SampleScene::Mesh => Camera::new(
            Point3::new(-495.333_9, 303.848_88, -828.657_3),
            Point3::new(-494.744_32, 303.853_5, -827.849_6),
            Vec3A::Y,
            40.0,
            aspect,
            0.0,
            90.0,
            0.0,
            1.0,
            Color::ZERO,
        ),
        SampleScene::Final => Camera::new(
            Point3::new(478.0, 278.0, -600.0),
            Point3::new(278.0, 278.0, 0.0),
            Vec3A::Y,
            40.0,
            aspect,
            0.0,
            10.0,
            0.0,
            1.0,
            Color::ZERO,
        ),
    }
}

fn constant(r: f32, g: f32, b: f32) -> Arc<ConstantTexture> {
    Arc::new(ConstantTexture::new(Color::new(r, g, b)))
}

/// The classic sphere field: a checkered ground, three feature spheres, and
/// a few hundred random small ones, all behind one BVH.
fn random_scene() -> Scene {
    let camera = camera_for(SampleScene::Random);
    let (time0, time1) = camera.shutter_time();

    let mut list: Vec<Arc<dyn Hittable>> = Vec::with_capacity(500);

    let checker = Arc::new(CheckerTexture::new(
        constant(0.2, 0.3, 0.1),
        constant(0.9, 0.9, 0.9),
    ));
    list.push(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(checker)),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = utils::random();
            let center = Point3::new(
                a as f32 + 0.9 * utils::random(),
                0.2,
                b as f32 + 0.9 * utils::random(),
            );
            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = Color::new(
                    utils::random() * utils::random(),
                    utils::random() * utils::random(),
                    utils::random() * utils::random(),
                );
                list.push(Arc::new(MovingSphere::new(
                    center,
                    center + Vec3A::new(0.0, 0.5 * utils::random(), 0.0),
                    0.0,
                    1.0,
                    0.2,
                    Arc::new(Lambertian::new(Arc::new(ConstantTexture::new(albedo)))),
                )));
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    0.5 * (1.0 + utils::random()),
                    0.5 * (1.0 + utils::random()),
                    0.5 * (1.0 + utils::random()),
                );
                list.push(Arc::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Metal::new(
                        Arc::new(ConstantTexture::new(albedo)),
                        0.5 * utils::random(),
                    )),
                )));
            } else {
                list.push(Arc::new(Sphere::new(
                    center,
                    0.2,
                    Arc::new(Dielectric::new(1.5)),
                )));
            }
        }
    }

    list.push(Arc::new(Sphere::new(
        Point3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    list.push(Arc::new(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(constant(0.4, 0.2, 0.1))),
    )));
    list.push(Arc::new(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(constant(0.7, 0.6, 0.5), 0.0)),
    )));

    let world = BvhNode::build(list, time0, time1);
    Scene::new(world, None, camera)
}

/// The Cornell box, optionally with the tall block wrapped in smoke. The
/// emissive panel and the glass sphere are registered as light shapes.
fn cornell_scene(smoke: bool) -> Scene {
    let mut world = HittableList::new();
    let mut lights = HittableList::new();

    let red = Arc::new(Lambertian::new(constant(0.65, 0.05, 0.05)));
    let white: Arc<Lambertian> = Arc::new(Lambertian::new(constant(0.73, 0.73, 0.73)));
    let green = Arc::new(Lambertian::new(constant(0.12, 0.45, 0.15)));
    let light = Arc::new(DiffuseLight::new(constant(50.0, 50.0, 50.0)));
    let glass = Arc::new(Dielectric::new(1.5));

    world.add(Arc::new(FlipNormals::new(Arc::new(AxisRect::new(
        Plane::Yz,
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        green,
    )))));
    world.add(Arc::new(AxisRect::new(
        Plane::Yz,
        0.0,
        555.0,
        0.0,
        555.0,
        0.0,
        red,
    )));

    let light_shape = Arc::new(AxisRect::new_light_shape(
        Plane::Xz,
        200.0,
        350.0,
        200.0,
        350.0,
        555.0,
        light,
    ));
    world.add(Arc::new(FlipNormals::new(light_shape.clone())));
    lights.add(light_shape);

    world.add(Arc::new(AxisRect::new(
        Plane::Xz,
        0.0,
        555.0,
        0.0,
        555.0,
        0.0,
        white.clone(),
    )));
    world.add(Arc::new(FlipNormals::new(Arc::new(AxisRect::new(
        Plane::Xy,
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        white.clone(),
    )))));

    let glass_sphere = Arc::new(Sphere::new_light_shape(
        Point3::new(190.0, 90.0, 190.0),
        90.0,
        glass,
    ));
    world.add(glass_sphere.clone());
    lights.add(glass_sphere);

    let tall_box: Arc<dyn Hittable> = Arc::new(Translate::new(
        Arc::new(RotateY::new(
            Arc::new(Cuboid::new(
                Point3::ZERO,
                Point3::new(165.0, 330.0, 165.0),
                white,
            )),
            15.0,
        )),
        Vec3A::new(265.0, 0.0, 295.0),
    ));

    if smoke {
        world.add(Arc::new(ConstantMedium::new(
            tall_box,
            0.01,
            constant(0.0, 0.0, 0.0),
        )));
    } else {
        world.add(tall_box);
    }

    let camera = camera_for(if smoke {
        SampleScene::CornellSmoke
    } else {
        SampleScene::Cornell
    });
    Scene::new(Arc::new(world), Some(lights), camera)
}

/// A large floor, an emissive ceiling panel, three OBJ meshes, and a pair of
/// feature spheres. Meshes that fail to load are skipped with a warning so
/// the scene still renders without the asset pack.
fn mesh_scene() -> Scene {
    let mut world = HittableList::new();
    let mut lights = HittableList::new();

    let color_sapphire = Color::new(0.06, 0.3, 0.7);
    let color_yellow = Color::new(1.0, 1.0, 0.0);
    let color_purple = Color::new(0.621, 0.351, 0.988);

    world.add(Arc::new(Cuboid::new(
        Point3::new(-2000.0, -100.0, -2000.0),
        Point3::new(2000.0, 100.0, 2000.0),
        Arc::new(Lambertian::new(Arc::new(ConstantTexture::new(color_purple)))),
    )));

    let light_mat = Arc::new(DiffuseLight::new(constant(30.0, 30.0, 30.0)));
    let light_shape = Arc::new(AxisRect::new_light_shape(
        Plane::Xz,
        -200.0,
        200.0,
        -200.0,
        200.0,
        1000.0,
        light_mat,
    ));
    world.add(Arc::new(FlipNormals::new(light_shape.clone())));
    lights.add(light_shape);

    let mut add_mesh = |path: &str,
                        scale: f32,
                        make_metal: bool,
                        mat: Option<Arc<dyn crate::material::Material>>,
                        angle: f32,
                        offset: Vec3A| {
        match TriMesh::from_obj_file(Path::new(path), scale, make_metal, mat) {
            Ok(mesh) => {
                world.add(Arc::new(Translate::new(
                    Arc::new(RotateY::new(Arc::new(mesh), angle)),
                    offset,
                )));
            }
            Err(err) => warn!(path, %err, "skipping mesh"),
        }
    };

    add_mesh(
        "runtimedata/r8.obj",
        25.0,
        false,
        None,
        20.0,
        Vec3A::new(220.0, 105.0, 145.0),
    );
    add_mesh(
        "runtimedata/totoro.obj",
        10.0,
        false,
        Some(Arc::new(Metal::new(
            Arc::new(ConstantTexture::new(color_sapphire)),
            0.5,
        ))),
        180.0,
        Vec3A::new(-60.0, 105.0, 145.0),
    );
    add_mesh(
        "runtimedata/luigi.obj",
        2.0,
        false,
        None,
        180.0,
        Vec3A::new(-320.0, 105.0, -100.0),
    );

    let glass_sphere = Arc::new(Sphere::new_light_shape(
        Point3::new(359.0, 300.0, -300.0),
        150.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(glass_sphere.clone());
    lights.add(glass_sphere);

    world.add(Arc::new(Sphere::new(
        Point3::new(500.0, 250.0, 100.0),
        125.0,
        Arc::new(Lambertian::new(Arc::new(ConstantTexture::new(color_yellow)))),
    )));

    Scene::new(
        Arc::new(world),
        Some(lights),
        camera_for(SampleScene::Mesh),
    )
}

/// The showcase: a ground of random boxes, a moving sphere, glass and metal
/// spheres, two volumes, an image-textured sphere, a noise sphere, and a
/// rotated cloud of small spheres.
fn final_scene() -> Scene {
    let mut world = HittableList::new();
    let mut lights = HittableList::new();

    let white: Arc<Lambertian> = Arc::new(Lambertian::new(constant(0.73, 0.73, 0.73)));
    let ground = Arc::new(Lambertian::new(constant(0.48, 0.83, 0.53)));

    let num_boxes = 20;
    let mut box_list: Vec<Arc<dyn Hittable>> = Vec::with_capacity(num_boxes * num_boxes);
    for i in 0..num_boxes {
        for j in 0..num_boxes {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = 100.0 * (utils::random() + 0.01);
            box_list.push(Arc::new(Cuboid::new(
                Point3::new(x0, 0.0, z0),
                Point3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            )));
        }
    }
    world.add(BvhNode::build(box_list, 0.0, 1.0));

    let light_mat = Arc::new(DiffuseLight::new(constant(7.0, 7.0, 7.0)));
    let light_shape = Arc::new(AxisRect::new_light_shape(
        Plane::Xz,
        123.0,
        423.0,
        147.0,
        412.0,
        554.0,
        light_mat,
    ));
    world.add(Arc::new(FlipNormals::new(light_shape.clone())));
    lights.add(light_shape);

    let center = Point3::new(400.0, 400.0, 200.0);
    world.add(Arc::new(MovingSphere::new(
        center,
        center + Vec3A::new(30.0, 0.0, 0.0),
        0.0,
        1.0,
        50.0,
        Arc::new(Lambertian::new(constant(0.7, 0.3, 0.1))),
    )));

    let glass_sphere = Arc::new(Sphere::new_light_shape(
        Point3::new(260.0, 150.0, 45.0),
        50.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(glass_sphere.clone());
    lights.add(glass_sphere);

    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(constant(0.8, 0.8, 0.9), 10.0)),
    )));

    let boundary = Arc::new(Sphere::new(
        Point3::new(360.0, 150.0, 145.0),
        70.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(boundary.clone());
    world.add(Arc::new(ConstantMedium::new(
        boundary,
        0.2,
        constant(0.2, 0.4, 0.9),
    )));

    let fog_boundary = Arc::new(Sphere::new(
        Point3::ZERO,
        5000.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(Arc::new(ConstantMedium::new(
        fog_boundary,
        0.0001,
        constant(1.0, 1.0, 1.0),
    )));

    world.add(Arc::new(Sphere::new(
        Point3::new(400.0, 200.0, 400.0),
        100.0,
        Arc::new(Lambertian::new(ImageTexture::from_file(
            "runtimedata/guitar.jpg",
        ))),
    )));

    let perlin = Arc::new(Perlin::new());
    world.add(Arc::new(Sphere::new(
        Point3::new(220.0, 280.0, 300.0),
        80.0,
        Arc::new(Lambertian::new(Arc::new(NoiseTexture::new(perlin, 0.1)))),
    )));

    let mut cloud: Vec<Arc<dyn Hittable>> = Vec::with_capacity(1000);
    for _ in 0..1000 {
        cloud.push(Arc::new(Sphere::new(
            Point3::new(
                165.0 * utils::random(),
                165.0 * utils::random(),
                165.0 * utils::random(),
            ),
            10.0,
            white.clone(),
        )));
    }
    world.add(Arc::new(Translate::new(
        Arc::new(RotateY::new(BvhNode::build(cloud, 0.0, 1.0), 15.0)),
        Vec3A::new(-100.0, 270.0, 395.0),
    )));

    Scene::new(
        Arc::new(world),
        Some(lights),
        camera_for(SampleScene::Final),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scene_builds() {
        utils::seed_thread_rng(81);
        for scene in SampleScene::ALL {
            let built = scene.build();
            assert!(
                built
                    .world()
                    .hit(
                        &crate::ray::Ray::new(
                            Point3::new(278.0, 278.0, -799.0),
                            Vec3A::new(0.0, 0.0, 1.0)
                        ),
                        0.001,
                        f32::MAX,
                    )
                    .is_some()
                    || scene == SampleScene::Random,
                "scene geometry must be reachable"
            );
        }
    }

    #[test]
    fn cornell_registers_two_light_shapes() {
        utils::seed_thread_rng(82);
        let scene = SampleScene::Cornell.build();
        let lights = scene.light_shapes().expect("cornell has light shapes");
        assert_eq!(lights.len(), 2);
        for shape in lights.objects() {
            assert!(shape.is_light_shape());
        }
    }

    #[test]
    fn random_scene_has_no_light_list() {
        utils::seed_thread_rng(83);
        let scene = SampleScene::Random.build();
        assert!(scene.light_shapes().is_none());
    }
}
