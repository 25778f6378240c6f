use saavy_fx::dsp::delay::{DelayLayout, LineSpec};
use saavy_fx::dsp::engine::FxEngine;
use saavy_fx::dsp::reverb::REVERB_LAYOUT;
use saavy_fx::FxError;

#[test]
fn single_sample_line_never_yields_a_handle() {
    let layout = DelayLayout::new([LineSpec::new("ok", 8), LineSpec::new("t", 1)]);
    let mut memory = [0.0; 16];

    match FxEngine::new(&mut memory, layout) {
        Err(FxError::LineTooShort { name, capacity }) => {
            assert_eq!(name, "t");
            assert_eq!(capacity, 1);
        }
        Err(other) => panic!("unexpected error {:?}", other),
        Ok(_) => panic!("layout with a single-sample line was accepted"),
    }
}

#[test]
fn handle_from_larger_engine_cannot_escape_smaller_arena() {
    let mut reverb_memory = vec![0.0; REVERB_LAYOUT.total()];
    let reverb_engine = FxEngine::new(&mut reverb_memory, REVERB_LAYOUT).unwrap();
    let del2 = reverb_engine.line_named("del2").unwrap();

    let small = DelayLayout::new([LineSpec::new("a", 4), LineSpec::new("b", 4)]);
    let mut memory = [0.0; 8];
    let mut engine = FxEngine::new(&mut memory, small).unwrap();
    engine.reset();

    for n in 0..32 {
        let mut c = engine.start();
        c.read(del2, 1.0);
        c.interpolate(del2, 100.5, 1.0);
        assert_eq!(c.accumulator(), 0.0, "sample {}", n);
        c.load(1.0);
        c.write(del2, 0.0);
        c.all_pass(del2, 0.5);
    }

    assert!(engine.into_memory().iter().all(|&s| s == 0.0));
}
