//! Integration tests across the public surface:
//! seed → derive → engine session → export/import.

use std::cell::RefCell;
use std::rc::Rc;

use op_core::{
    Animal, AnimalGrantPosition, CellId, CellSnapshot, CoinEngine, CognitiveFunction, Conflict,
    GrantOrder, OpError, OpTypeSeed, Quadra, export_json, import_json,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(42)
}

fn labels(functions: &[CognitiveFunction]) -> Vec<String> {
    functions.iter().map(|f| f.label()).collect()
}

/// Test 1: the worked example derives and loads into a consistent engine.
#[test]
fn derive_then_load_engine() {
    let t = OpTypeSeed::from_labels("Se", "Fi", false, "FM", "CS/B(P)", "#1")
        .unwrap()
        .derive()
        .unwrap();
    assert_eq!(t.quadra(), Quadra::Gamma);

    let engine = CoinEngine::from_op_type(&t);
    assert_eq!(labels(&engine.functions()), labels(t.grant_stack()));
    assert!(engine.conflicts().is_empty());

    for (i, animal) in t.animal_stack().animals().iter().enumerate() {
        let position = AnimalGrantPosition::ALL
            .into_iter()
            .find(|p| engine.animal_at(*p) == Some(*animal))
            .expect("every stacked animal sits in some position");
        assert_eq!(engine.animal_cell(position).order, Some(i));
    }
}

/// Test 2: the engine edits preserve the opposite pairs of the stack.
#[test]
fn edits_keep_opposite_pairs() {
    let mut engine = CoinEngine::from_seed(CognitiveFunction::from_label("Ti").unwrap());
    engine.switch_letter(1).unwrap();
    engine.switch_charge(0).unwrap();
    engine.switch_letter(2).unwrap();
    engine.switch_main_axis().unwrap();
    engine.switch_letter(3).unwrap();

    let f = engine.functions();
    assert_eq!(f[3], f[0].opposite());
    assert_eq!(f[2], f[1].opposite());
    assert!(engine.function_cell(GrantOrder::ALL[3]).is_demon);
}

/// Test 3: a session from a blank slate reports conflicts and refuses
/// mid-stack charge edits.
#[test]
fn blank_session_to_complete_type() {
    let mut engine = CoinEngine::new();
    let changes = Rc::new(RefCell::new(Vec::<CellSnapshot>::new()));
    let sink = Rc::clone(&changes);
    engine.subscribe_all(move |s| sink.borrow_mut().push(*s));

    engine.switch_letter(0).unwrap(); // F?
    engine.switch_charge(0).unwrap(); // Fi, Te
    engine.switch_letter(1).unwrap(); // S?
    assert_eq!(labels(&engine.functions()), vec!["Fi", "S?", "N?", "Te"]);

    engine.set_animal_order(AnimalGrantPosition::StrongerInfo).unwrap();
    assert_eq!(
        engine.conflicts(),
        vec![Conflict::UnformedAnimal {
            position: AnimalGrantPosition::StrongerInfo
        }]
    );
    // ordered first but unformed, so fn1 is no demon yet
    assert!(!engine.function_cell(GrantOrder::ALL[1]).is_demon);

    let before = engine.generation();
    assert!(matches!(
        engine.switch_charge(1),
        Err(OpError::InvalidOperation(_))
    ));
    assert_eq!(engine.generation(), before);

    assert!(changes.borrow().iter().any(|s| s.id() == CellId::Function(GrantOrder::ALL[3])));
}

/// Test 4: exported JSON re-imports to the same type, for many random seeds.
#[test]
fn export_import_random_types() {
    let mut rng = rng();
    for _ in 0..50 {
        let t = OpTypeSeed::random(&mut rng).derive().unwrap();
        let json = export_json(&t).unwrap();
        assert_eq!(import_json(&json).unwrap(), t);
    }
}

/// Test 5: a decider sharing the observer's charge flips the secondary savior.
#[test]
fn same_charge_seed_flips_secondary() {
    let seed = OpTypeSeed::from_labels("Ne", "Te", false, "MM", "SBCP", "#2").unwrap();
    let t = seed.derive().unwrap();
    assert_eq!(labels(t.grant_stack()), vec!["Te", "Si", "Ne", "Fi"]);
    assert_eq!(t.quadra(), Quadra::Delta);
    assert_eq!(t.savior_animal(), Animal::Blast);
}

/// Test 6: derivation is all-or-nothing; a bad seed yields only an error.
#[test]
fn bad_seed_yields_error() {
    let seed = OpTypeSeed::from_labels("Ne", "Te", false, "MM", "SBCP", "#2").unwrap();
    let swapped = OpTypeSeed {
        observer: seed.decider,
        decider: seed.observer,
        ..seed
    };
    assert!(matches!(
        swapped.derive(),
        Err(OpError::IncompatibleAxis { .. })
    ));

    // Te/Si form Blast, missing from the first two animals
    let buried = OpTypeSeed::from_labels("Ne", "Te", false, "MM", "SCPB", "#2").unwrap();
    assert!(matches!(
        buried.derive(),
        Err(OpError::Validation { .. })
    ));
}

/// Test 7: the double-activated cell always holds the opposite of the last
/// animal once the engine completes the ordering itself.
#[test]
fn completed_ordering_marks_double_activation() {
    let mut rng = rng();
    for _ in 0..20 {
        let t = OpTypeSeed::random(&mut rng).derive().unwrap();
        let mut engine = CoinEngine::from_op_type(&t);
        engine.reset_animals().unwrap();
        for position in [
            AnimalGrantPosition::WeakerEnergy,
            AnimalGrantPosition::StrongerInfo,
            AnimalGrantPosition::StrongerEnergy,
        ] {
            engine.set_animal_order(position).unwrap();
        }

        let last = AnimalGrantPosition::ALL
            .into_iter()
            .find(|p| engine.animal_cell(*p).order == Some(3))
            .unwrap();
        assert_eq!(last, AnimalGrantPosition::WeakerInfo);
        let double = AnimalGrantPosition::ALL
            .into_iter()
            .find(|p| engine.animal_cell(*p).is_double_activated)
            .unwrap();
        assert_eq!(
            engine.animal_at(double),
            engine.animal_at(last).map(Animal::opposite)
        );
    }
}
