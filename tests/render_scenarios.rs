use blackhole_tracer::data::ImportExport;
use blackhole_tracer::physics::constants::schwarzschild_radius_solar;
use blackhole_tracer::physics::{AccretionDisk, SchwarzschildMetric};
use blackhole_tracer::rendering::{Camera, RayFate, RayTracer, Renderer};
use blackhole_tracer::simulation::{SimulationConfig, Simulator};
use blackhole_tracer::Rgb;
use tempfile::tempdir;

fn scene(threads: usize) -> Renderer {
    let metric = SchwarzschildMetric::new(10.0);
    let rs = metric.schwarzschild_radius();
    let camera = Camera::new(40.0 * rs, 80f64.to_radians(), 50f64.to_radians(), 24, 16);
    let tracer = RayTracer::new(metric, camera)
        .with_disk(AccretionDisk::new(10.0, 0.1, 0.0))
        .with_step(0.15);
    Renderer::new(tracer, threads)
}

#[test]
fn test_thread_count_invariance() {
    let reference = scene(1).render().unwrap();
    for threads in [2, 3, 5, 16, 64] {
        let image = scene(threads).render().unwrap();
        assert_eq!(image, reference, "{threads} threads");
    }
}

#[test]
fn test_scene_contains_shadow_disk_and_sky() {
    let mut renderer = scene(4);
    let image = renderer.render().unwrap();
    let stats = renderer.stats();
    assert_eq!(stats.rays(), 24 * 16);
    assert!(stats.captured > 0, "{stats:?}");
    assert!(stats.disk > 0, "{stats:?}");
    assert!(stats.escaped > 0, "{stats:?}");
    assert_eq!(stats.exhausted, 0);
    assert!(image.pixels().iter().all(|c| *c != Rgb::MAGENTA));
}

#[test]
fn test_head_on_ray_is_captured_for_any_mass() {
    for mass in [1.0, 10.0, 4.0e6] {
        let metric = SchwarzschildMetric::new(mass);
        let rs = schwarzschild_radius_solar(mass);
        for distance in [5.0, 50.0, 500.0] {
            let camera = Camera::new(distance * rs, 0.7, 0.5, 4, 4);
            let tracer = RayTracer::new(metric, camera);
            let out = tracer.trace_ray(0.0, 0.0);
            assert!(
                matches!(out.fate, RayFate::CapturedByHorizon { .. }),
                "M = {mass}, d = {distance}: {:?}",
                out.fate
            );
        }
    }
}

#[test]
fn test_far_off_axis_rays_escape() {
    let metric = SchwarzschildMetric::new(10.0);
    let rs = metric.schwarzschild_radius();
    let camera = Camera::new(100.0 * rs, 0.6, 0.5, 4, 4);
    let tracer = RayTracer::new(metric, camera).with_disk(AccretionDisk::new(10.0, 0.1, 0.0));
    for alpha in [4.0, -4.0, 10.0] {
        let out = tracer.trace_ray(alpha * camera.distance, 0.0);
        assert!(
            matches!(out.fate, RayFate::EscapedToInfinity { .. }),
            "alpha = {alpha} r0: {:?}",
            out.fate
        );
    }
}

#[test]
fn test_simulator_round_trip_through_ppm() {
    let dir = tempdir().unwrap();
    let mut sim = Simulator::new(SimulationConfig {
        width: 20,
        height: 12,
        distance_rs: 40.0,
        step: 0.2,
        threads: 3,
        output_dir: dir.path().to_path_buf(),
        ..Default::default()
    });
    let image = sim.render().unwrap();
    let paths = sim.save(&image, false).unwrap();
    assert_eq!(paths.len(), 1);

    let decoded = ImportExport::read_ppm(&paths[0]).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (20, 12));
    assert_eq!(decoded.into_raw(), ImportExport::to_bytes(&image));
}
