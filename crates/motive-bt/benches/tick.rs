use std::time::Instant;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use motive_bt::{Motion, MotionContext, MotionElement, SequenceElement};
use motive_core::{
    ActuateCmd, BehaviorElement, NoopReactionService, NullMessenger, Outcome, ReactionDef,
    SenseInfo, Services,
};

#[derive(Default)]
struct Pass;

impl MotionElement for Pass {
    const NAME: &'static str = "Pass";
    const KNEE_JERK_REACTION: ReactionDef = ReactionDef::Enabled;
    const FLINCH_REACTION: ReactionDef = ReactionDef::Enabled;

    fn tick(&mut self, sense: &SenseInfo, _ctx: &MotionContext<'_>) -> Outcome {
        Outcome::success(ActuateCmd::velocity(sense.measured_velocity))
    }
}

fn bench_sequence_tick(c: &mut Criterion) {
    let services = Services::new(
        std::sync::Arc::new(NullMessenger),
        std::sync::Arc::new(NoopReactionService),
    );
    let mut leaves: Vec<Motion<Pass>> = (0..32).map(|_| Motion::default()).collect();
    let mut seq = leaves
        .iter_mut()
        .fold(SequenceElement::default(), |seq, leaf| seq.with_child(leaf));
    let sense = SenseInfo::at(Instant::now());

    c.bench_function("motive-bt/sequence(leaves=32)", |b| {
        b.iter(|| {
            seq.initialize(services.clone());
            let mut outcome = seq.tick(&sense);
            while outcome.is_running() {
                outcome = seq.tick(&sense);
            }
            seq.finalize();
            black_box(outcome);
        })
    });
}

criterion_group!(benches, bench_sequence_tick);
criterion_main!(benches);
