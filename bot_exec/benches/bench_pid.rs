//! # PID Benchmark

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bot_lib::{
    ctrl::PidController,
    lift_ctrl::{self, LiftCtrl, LiftRequest}
};
use util::module::State;

fn pid_benchmark(c: &mut Criterion) {
    let params = lift_ctrl::Params::default();

    // Bench a single controller tick
    c.bench_function("PidController::compute", |b| {
        let mut pid = PidController::new(
            params.up_angle_deg, 
            &params.pid, 
            &params.exit, 
            Duration::default()
        );
        let mut now = Duration::default();

        b.iter(|| {
            now += Duration::from_millis(10);
            pid.compute(black_box(12.5), now)
        })
    });

    // Bench a whole lift move against a simple plant, as run by the exec
    c.bench_function("LiftCtrl::raise", |b| {
        b.iter(|| {
            let mut lift = LiftCtrl::with_params(params.clone());
            let mut input = lift_ctrl::InputData {
                angle_deg: params.down_angle_deg,
                request: Some(LiftRequest::Raise),
                ..Default::default()
            };

            for i in 0..100u64 {
                input.now = Duration::from_millis(i * 10);
                let (out, _) = lift.proc(&input).unwrap();
                input.request = None;

                if let lift_ctrl::OutputData::Spin { volts } = out {
                    input.angle_deg += volts * 0.6;
                }
            }
        })
    });
}

criterion_group!(benches, pid_benchmark);
criterion_main!(benches);
