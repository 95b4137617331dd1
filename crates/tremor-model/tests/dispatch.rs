use tremor_core::{ModelError, Stage, Stages};
use tremor_model::{ModelRegistry, StageError};
use tremor_test_utils::{single_element, CallLog, FailingModel, RecordingModel, TestBed};
use tremor_mesh::ElementType;

fn bed() -> TestBed {
    TestBed::new(single_element(ElementType::Tet4).unwrap()).unwrap()
}

#[test]
fn registration_order_within_each_stage() {
    let log = CallLog::new();
    let mut reg = ModelRegistry::new();
    let shared = Stages::BEFORE_MATERIAL_MODEL | Stages::AFTER_CORRECTION;
    reg.register(Box::new(RecordingModel::new("A", shared, &log))).unwrap();
    reg.register(Box::new(RecordingModel::new(
        "B",
        shared | Stages::AT_SECONDARIES,
        &log,
    )))
    .unwrap();
    reg.register(Box::new(RecordingModel::new("C", Stages::AFTER_CORRECTION, &log)))
        .unwrap();

    let mut bed = bed();
    let mut ctx = bed.context();
    for _ in 0..3 {
        for stage in Stage::ALL {
            reg.run_stage(stage, &mut ctx).unwrap();
        }
    }

    assert_eq!(
        log.order_for(Stage::BeforeMaterialModel),
        vec!["A", "B", "A", "B", "A", "B"]
    );
    assert_eq!(
        log.order_for(Stage::AfterCorrection),
        vec!["A", "B", "C", "A", "B", "C", "A", "B", "C"]
    );
    assert_eq!(log.count("B", Stage::AtSecondaries), 3);
    // Flags not declared are never invoked.
    assert_eq!(log.count("A", Stage::AtSecondaries), 0);
    assert_eq!(log.count("C", Stage::BeforeMaterialModel), 0);
    for stage in [Stage::BeforeFieldUpdate, Stage::AtMaterialModel, Stage::AfterConfiguration] {
        assert!(log.order_for(stage).is_empty());
    }
}

#[test]
fn failure_aborts_the_stage_and_names_the_model() {
    let log = CallLog::new();
    let mut reg = ModelRegistry::new();
    reg.register(Box::new(FailingModel::new("fails", Stage::AtSecondaries, 1)))
        .unwrap();
    reg.register(Box::new(RecordingModel::new("after", Stages::AT_SECONDARIES, &log)))
        .unwrap();

    let mut bed = bed();
    let mut ctx = bed.context();
    reg.run_stage(Stage::AtSecondaries, &mut ctx).unwrap();
    let err = reg.run_stage(Stage::AtSecondaries, &mut ctx).unwrap_err();
    assert_eq!(
        err,
        StageError {
            model: "fails".into(),
            stage: Stage::AtSecondaries,
            reason: ModelError::ExecutionFailed {
                reason: "deliberate failure after 1 successful calls".into()
            },
        }
    );
    // The model after the failing one did not run the second time.
    assert_eq!(log.count("after", Stage::AtSecondaries), 1);
}

#[test]
fn timings_count_only_invoked_hooks() {
    let log = CallLog::new();
    let mut reg = ModelRegistry::new();
    reg.register(Box::new(RecordingModel::new("x", Stages::AFTER_CORRECTION, &log)))
        .unwrap();
    reg.register(Box::new(RecordingModel::new("y", Stages::NONE, &log)))
        .unwrap();
    let mut bed = bed();
    let mut ctx = bed.context();
    for stage in Stage::ALL {
        reg.run_stage(stage, &mut ctx).unwrap();
    }
    let calls: Vec<(String, u64)> = reg.timings().map(|t| (t.name.clone(), t.calls)).collect();
    assert_eq!(calls, vec![("x".to_string(), 1), ("y".to_string(), 0)]);
}
