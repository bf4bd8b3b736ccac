use aurora_render::{Aabb, Ray, RenderSettings, Renderer, SampleScene};
use criterion::{Criterion, criterion_group, criterion_main};
use std::sync::Arc;
use utils::{Point3, Vec3A};

fn bench_aabb_hit(c: &mut Criterion) {
    let bb = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
    let ray = Ray::new(Point3::new(0.2, 0.1, -5.0), Vec3A::new(0.01, 0.02, 1.0));

    c.bench_function("aabb hit", |b| {
        b.iter(|| {
            let _ = bb.hit(&ray, 0.001, f32::MAX);
        })
    });
}

fn bench_cornell_pass(c: &mut Criterion) {
    c.bench_function("cornell one pass", |b| {
        b.iter(|| {
            utils::seed_thread_rng(17);
            let scene = Arc::new(SampleScene::Cornell.build());
            let settings = RenderSettings::new(64, 64, 2, 10, 2, true, 17);
            let mut renderer = Renderer::new(settings);
            renderer.begin_trace(scene, None);
            assert!(renderer.wait_for_trace_to_finish(None));
        })
    });
}

criterion_group!(name = benches; config = Criterion::default().sample_size(10); targets = bench_aabb_hit, bench_cornell_pass);
criterion_main!(benches);
