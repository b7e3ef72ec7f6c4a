use roimerge::lowlevel::{
    run_ticks_dyn, CLASSIFICATION_LIST_VECTOR_HAS_MIN_SIZE, LANDMARK_CONVERT,
    MERGE_BY_LARGER_NORMALIZED_RECT_VECTOR, MERGE_ROI_VECTORS,
    NORMALIZED_LANDMARK_LIST_VECTOR_HAS_MIN_SIZE, NORMALIZED_RECT_VECTOR_HAS_MIN_SIZE,
};
use roimerge::{
    Direction, DynNode, InputSet, Landmark, LandmarkList, MinSizeOptions, NodeDecl, NodeError,
    NodeOptions, NodeRegistry, NormalizedRect, Packet, Payload, PayloadKind, PortTag,
    RoiMergeOptions, Timestamp,
};

fn roi_decl() -> NodeDecl {
    NodeDecl::from_streams(
        &[
            "RECTS_FROM_LANDMARKS:rects_from_landmarks",
            "RECTS_FROM_DETECTION:rects_from_detection",
        ],
        &["merged_rects"],
    )
    .unwrap()
}

fn rect(x: f32, y: f32) -> NormalizedRect {
    NormalizedRect::from_center(x, y, 0.1, 0.1)
}

#[test]
fn builtin_registry_lists_every_node() {
    let registry = NodeRegistry::with_builtin();
    let names: Vec<_> = registry.names().collect();
    assert_eq!(names.len(), 6);
    for name in [
        NORMALIZED_RECT_VECTOR_HAS_MIN_SIZE,
        NORMALIZED_LANDMARK_LIST_VECTOR_HAS_MIN_SIZE,
        CLASSIFICATION_LIST_VECTOR_HAS_MIN_SIZE,
        MERGE_BY_LARGER_NORMALIZED_RECT_VECTOR,
        MERGE_ROI_VECTORS,
        LANDMARK_CONVERT,
    ] {
        assert!(registry.contains(name), "{name}");
    }
}

#[test]
fn unknown_and_duplicate_names_are_rejected() {
    let mut registry = NodeRegistry::with_builtin();
    let err = registry
        .build("NoSuchCalculator", &roi_decl(), &NodeOptions::default())
        .err()
        .unwrap();
    assert_eq!(
        err,
        NodeError::UnknownNode {
            name: "NoSuchCalculator".to_owned()
        }
    );

    fn noop(_options: &NodeOptions) -> roimerge::NodeResult<Box<dyn DynNode>> {
        Err(NodeError::InvalidOption("unused"))
    }
    let err = registry.register(MERGE_ROI_VECTORS, noop).err().unwrap();
    assert!(matches!(err, NodeError::DuplicateNode { .. }));

    registry.register("Custom", noop).unwrap();
    assert!(registry.contains("Custom"));
}

#[test]
fn roi_merger_rejects_wrong_arity() {
    let registry = NodeRegistry::with_builtin();
    let decl = NodeDecl::new()
        .input(PortTag::RectsFromLandmarks, "a")
        .output(PortTag::Index(0), "out");

    let err = registry
        .build(MERGE_ROI_VECTORS, &decl, &NodeOptions::default())
        .err()
        .unwrap();
    assert_eq!(
        err,
        NodeError::PortCountMismatch {
            direction: Direction::Input,
            expected: 2,
            got: 1,
        }
    );

    let decl = NodeDecl::from_streams(
        &["RECTS_FROM_LANDMARKS:a", "RECTS_FROM_DETECTION:b"],
        &["out", "extra"],
    )
    .unwrap();
    let err = registry
        .build(MERGE_ROI_VECTORS, &decl, &NodeOptions::default())
        .err()
        .unwrap();
    assert_eq!(
        err,
        NodeError::PortCountMismatch {
            direction: Direction::Output,
            expected: 1,
            got: 2,
        }
    );
}

#[test]
fn roi_merger_rejects_wrong_tags() {
    let registry = NodeRegistry::with_builtin();
    let decl = NodeDecl::from_streams(&["RECTS_FROM_LANDMARKS:a", "b"], &["out"]).unwrap();
    let err = registry
        .build(MERGE_ROI_VECTORS, &decl, &NodeOptions::default())
        .err()
        .unwrap();
    assert_eq!(
        err,
        NodeError::MissingPort {
            direction: Direction::Input,
            tag: PortTag::RectsFromDetection,
        }
    );

    let decl = NodeDecl::from_streams(&["RECTS_FROM_LANDMARKS:a", "RECTS_FROM_LANDMARKS:b"], &["o"])
        .unwrap();
    let err = registry
        .build(MERGE_ROI_VECTORS, &decl, &NodeOptions::default())
        .err()
        .unwrap();
    assert_eq!(
        err,
        NodeError::DuplicatePort {
            direction: Direction::Input,
            tag: PortTag::RectsFromLandmarks,
        }
    );
}

#[test]
fn declared_stream_type_must_match() {
    let registry = NodeRegistry::with_builtin();
    let decl = NodeDecl::new()
        .typed_input(PortTag::Iterable, "hands", PayloadKind::ClassificationListVec)
        .output(PortTag::Index(0), "has_hands");

    let err = registry
        .build(
            NORMALIZED_RECT_VECTOR_HAS_MIN_SIZE,
            &decl,
            &NodeOptions::default(),
        )
        .err()
        .unwrap();
    assert_eq!(
        err,
        NodeError::PayloadMismatch {
            tag: PortTag::Iterable,
            expected: PayloadKind::NormalizedRectVec,
            got: PayloadKind::ClassificationListVec,
        }
    );

    registry
        .build(
            CLASSIFICATION_LIST_VECTOR_HAS_MIN_SIZE,
            &decl,
            &NodeOptions::default(),
        )
        .unwrap();
}

#[test]
fn invalid_options_fail_at_build_time() {
    let registry = NodeRegistry::with_builtin();
    let options = NodeOptions {
        roi_merge: RoiMergeOptions {
            center_grid_scale: 0,
        },
        ..NodeOptions::default()
    };
    let err = registry
        .build(MERGE_ROI_VECTORS, &roi_decl(), &options)
        .err()
        .unwrap();
    assert!(matches!(err, NodeError::InvalidOption(_)));
}

#[test]
fn erased_roi_merger_follows_typed_policy() {
    let registry = NodeRegistry::with_builtin();
    let node = registry
        .build(MERGE_ROI_VECTORS, &roi_decl(), &NodeOptions::default())
        .unwrap();

    let duplicates = vec![rect(0.501, 0.501), rect(0.502, 0.502)];
    let detection = vec![rect(0.25, 0.5)];
    let ticks = vec![
        InputSet::new()
            .with(
                PortTag::RectsFromLandmarks,
                Packet::new(duplicates.clone(), Timestamp::new(0)),
            )
            .with(
                PortTag::RectsFromDetection,
                Packet::new(detection.clone(), Timestamp::new(0)),
            ),
        InputSet::new().with(
            PortTag::RectsFromLandmarks,
            Packet::new(duplicates.clone(), Timestamp::new(1)),
        ),
        InputSet::new(),
    ];

    let outputs = run_ticks_dyn(node.as_ref(), ticks).unwrap();
    assert_eq!(
        outputs,
        vec![
            Some(Packet::new(Payload::Rects(detection), Timestamp::new(0))),
            Some(Packet::new(Payload::Rects(duplicates), Timestamp::new(1))),
            None,
        ]
    );
}

#[test]
fn erased_node_reports_wrong_payload() {
    let registry = NodeRegistry::with_builtin();
    let decl = NodeDecl::from_streams(&["LANDMARKS:world"], &["NORM_LANDMARKS:norm"]).unwrap();
    let node = registry
        .build(LANDMARK_CONVERT, &decl, &NodeOptions::default())
        .unwrap();

    let tick = InputSet::new().with(PortTag::Landmarks, Packet::new(true, Timestamp::new(0)));
    let err = node.process_dyn(tick).err().unwrap();
    assert_eq!(
        err,
        NodeError::PayloadMismatch {
            tag: PortTag::Landmarks,
            expected: PayloadKind::LandmarkList,
            got: PayloadKind::Bool,
        }
    );

    let world = LandmarkList::new(vec![Landmark {
        x: 0.1,
        y: 0.2,
        z: 0.3,
        visibility: Some(1.0),
        presence: None,
    }]);
    let tick = InputSet::new().with(PortTag::Landmarks, Packet::new(world, Timestamp::new(5)));
    let out = node.process_dyn(tick).unwrap().unwrap();
    assert_eq!(out.timestamp(), Timestamp::new(5));
    assert_eq!(out.payload().kind(), PayloadKind::NormalizedLandmarkList);
}

#[test]
fn erased_gate_and_merger_use_options() {
    let registry = NodeRegistry::with_builtin();
    let options = NodeOptions {
        min_size: MinSizeOptions { min_size: 2 },
        ..NodeOptions::default()
    };

    let gate_decl = NodeDecl::from_streams(&["ITERABLE:rects"], &["enough"]).unwrap();
    let gate = registry
        .build(NORMALIZED_RECT_VECTOR_HAS_MIN_SIZE, &gate_decl, &options)
        .unwrap();
    let tick = InputSet::new().with(
        PortTag::Iterable,
        Packet::new(vec![rect(0.1, 0.1)], Timestamp::new(3)),
    );
    let out = gate.process_dyn(tick).unwrap().unwrap();
    assert_eq!(out.payload(), &Payload::Flag(false));

    let merge_decl = NodeDecl::from_streams(&["a", "b"], &["out"]).unwrap();
    let merger = registry
        .build(MERGE_BY_LARGER_NORMALIZED_RECT_VECTOR, &merge_decl, &options)
        .unwrap();
    let tick = InputSet::new()
        .with(PortTag::Index(0), Packet::new(vec![rect(0.1, 0.1)], Timestamp::new(4)))
        .with(
            PortTag::Index(1),
            Packet::new(vec![rect(0.2, 0.2), rect(0.3, 0.3)], Timestamp::new(5)),
        );
    let out = merger.process_dyn(tick).unwrap().unwrap();
    assert_eq!(out.timestamp(), Timestamp::new(5));
}

#[test]
fn packet_on_undeclared_port_is_an_error() {
    let registry = NodeRegistry::with_builtin();
    let decl = NodeDecl::from_streams(&["ITERABLE:r"], &["enough"]).unwrap();
    let gate = registry
        .build(NORMALIZED_RECT_VECTOR_HAS_MIN_SIZE, &decl, &NodeOptions::default())
        .unwrap();

    let tick = InputSet::new().with(
        PortTag::RectsFromDetection,
        Packet::new(vec![rect(0.5, 0.5)], Timestamp::new(0)),
    );
    let err = gate.process_dyn(tick).err().unwrap();
    assert_eq!(
        err,
        NodeError::UnexpectedPort {
            direction: Direction::Input,
            tag: PortTag::RectsFromDetection,
        }
    );

    let merger = registry
        .build(MERGE_ROI_VECTORS, &roi_decl(), &NodeOptions::default())
        .unwrap();
    let tick = InputSet::new()
        .with(
            PortTag::RectsFromLandmarks,
            Packet::new(vec![rect(0.2, 0.2)], Timestamp::new(1)),
        )
        .with(PortTag::Index(2), Packet::new(true, Timestamp::new(1)));
    let err = run_ticks_dyn(merger.as_ref(), vec![tick]).err().unwrap();
    assert_eq!(
        err,
        NodeError::UnexpectedPort {
            direction: Direction::Input,
            tag: PortTag::Index(2),
        }
    );

    let out = gate.process_dyn(InputSet::new()).unwrap();
    assert!(out.is_none());
}
