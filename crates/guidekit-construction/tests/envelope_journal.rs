//! Envelope serialization through a file, the way a session journal
//! would persist command records.

use std::fs;

use guidekit_construction::commands::{
    Command, CreateGuideCommand, CreatePointBatchCommand, RotateGuideCommand,
};
use guidekit_construction::{CommandEnvelope, ConstructionSpace, Orientation};
use guidekit_core::geometry::Point;

#[test]
fn test_envelopes_round_trip_through_file() {
    let mut space = ConstructionSpace::new();

    let mut create = CreateGuideCommand::new(Orientation::Vertical, 5.0, Some("m".to_string()));
    assert!(create.execute(&mut space));
    let id = create.created_guide().unwrap().id;
    let mut rotate = RotateGuideCommand::new(id, Point::new(0.0, 0.0), 45.0);
    assert!(rotate.execute(&mut space));
    let batch = CreatePointBatchCommand::along_segment(
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        2,
        None,
    );

    let envelopes: Vec<CommandEnvelope> = vec![
        create.envelope(),
        rotate.envelope(),
        batch.envelope(),
    ];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.json");
    fs::write(&path, serde_json::to_string_pretty(&envelopes).unwrap()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let loaded: Vec<CommandEnvelope> = serde_json::from_str(&text).unwrap();
    assert_eq!(loaded.len(), 3);

    assert_eq!(loaded[0].kind, "create_guide");
    assert_eq!(loaded[0].data["offset"], 5.0);
    assert_eq!(loaded[0].data["label"], "m");

    assert_eq!(loaded[1].kind, "rotate_guide");
    assert_eq!(loaded[1].data["guide_id"], id);
    assert_eq!(loaded[1].data["angle_deg"], 45.0);

    assert_eq!(loaded[2].kind, "create_point_batch");
    assert_eq!(loaded[2].data["positions"].as_array().unwrap().len(), 3);

    for (original, back) in envelopes.iter().zip(loaded.iter()) {
        assert_eq!(original.id, back.id);
        assert_eq!(original.timestamp, back.timestamp);
        assert_eq!(original.version, back.version);
    }
}
