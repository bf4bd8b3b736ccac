use crate::camera::Camera;
use crate::hittable::Hittable;
use crate::hittable_list::HittableList;
use std::sync::Arc;

/// Everything a render needs: the world, the shapes worth importance
/// sampling, and the camera. Light shapes are `Arc` clones of nodes that
/// also live in the world, so the list is a view, not a second owner of
/// distinct geometry.
pub struct Scene {
    world: Arc<dyn Hittable>,
    light_shapes: Option<Arc<HittableList>>,
    camera: Camera,
}

impl Scene {
    pub fn new(
        world: Arc<dyn Hittable>,
        light_shapes: Option<HittableList>,
        camera: Camera,
    ) -> Scene {
        Scene {
            world,
            light_shapes: light_shapes
                .filter(|shapes| !shapes.is_empty())
                .map(Arc::new),
            camera,
        }
    }

    pub fn world(&self) -> &Arc<dyn Hittable> {
        &self.world
    }

    pub fn light_shapes(&self) -> Option<&Arc<HittableList>> {
        self.light_shapes.as_ref()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
}
