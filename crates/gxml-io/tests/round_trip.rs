use gxml_core::{Rgb, Scene};
use gxml_io::{decode, BinaryRenderEngine, WireError};
use gxml_render::{JsonRenderEngine, RenderDocument};

const SCENE: &str = r##"{
    "elements": [
        {
            "id": "wall-1",
            "transform": {"offset": [1, 0, 0], "rotation": [0, 0, 90], "scale": [3, 2, 0.1]},
            "polys": [
                {"id": "wall-1/front", "points": [[0, 0, 0], [3, 0, 0], [3, 2, 0], [0, 2, 0]]},
                {"id": "wall-1/back", "geoKey": "back",
                 "points": [[0, 0, 0.1], [3, 0, 0.1], [3, 2, 0.1], [0, 2, 0.1]]}
            ],
            "lines": [{"id": "wall-1/edge", "points": [[0, 0], [3, 0]]}]
        },
        {
            "id": "shelf",
            "color": "#4361ee",
            "polys": [{"id": "shelf/top", "points": [{"x": 0.1, "y": 0.2, "z": 0.3}, [1.7, 0.2]]}],
            "children": [
                {"id": "bracket", "polys": [{"id": "", "points": [[-1e-3, 12345.678, 9]]}]}
            ]
        },
        {"id": "void", "polys": [{"id": "void/none", "points": []}]}
    ]
}"##;

fn render_both() -> (RenderDocument, Vec<u8>) {
    let scene = Scene::from_json(SCENE).unwrap();

    let mut json = JsonRenderEngine::new();
    scene.render(&mut json).unwrap();

    let mut binary = BinaryRenderEngine::new();
    scene.render(&mut binary).unwrap();

    (json.to_document(), binary.to_bytes().unwrap())
}

fn close(a: f32, b: f64) -> bool {
    (a as f64 - b).abs() <= 1e-6 * b.abs().max(1.0)
}

#[test]
fn binary_matches_json_for_same_render() {
    let (doc, bytes) = render_both();
    let decoded = decode(&bytes).unwrap();

    assert_eq!(decoded.panels.len(), doc.panels.len());
    let json_vertices: usize = doc.panels.iter().map(|p| p.points.len()).sum();
    assert_eq!(decoded.total_vertex_count as usize, json_vertices);

    for (bin, json) in decoded.panels.iter().zip(&doc.panels) {
        assert_eq!(bin.id.as_bytes(), json.id.as_bytes());
        assert_eq!(bin.vertices.len(), json.points.len());

        let rgb = Rgb::from_hex(&json.color).unwrap();
        assert_eq!(bin.color, rgb.to_array(), "color of '{}'", json.id);

        for (v, p) in bin.vertices.iter().zip(&json.points) {
            for axis in 0..3 {
                assert!(close(v[axis], p[axis]), "'{}': {:?} vs {:?}", json.id, v, p);
            }
        }

        match (&bin.endpoints, json.start_point, json.end_point) {
            (Some((s, e)), Some(js), Some(je)) => {
                for axis in 0..3 {
                    assert!(close(s[axis], js[axis]));
                    assert!(close(e[axis], je[axis]));
                }
            }
            (None, None, None) => {}
            other => panic!("endpoint mismatch for '{}': {:?}", json.id, other),
        }
    }
}

#[test]
fn panel_order_and_ids_follow_call_order() {
    let (doc, _) = render_both();
    let ids: Vec<&str> = doc.panels.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["wall-1/front", "wall-1/back", "shelf/top", "", "void/none"]
    );
    assert_eq!(doc.lines.len(), 1);
}

#[test]
fn endpoints_only_for_transformed_elements() {
    let (doc, bytes) = render_both();
    let decoded = decode(&bytes).unwrap();

    // wall-1 is rotated 90° about Z, so its start/end run along +Y.
    let (start, end) = decoded.panels[0].endpoints.unwrap();
    assert!(close(start[0], 0.0) && close(start[1], 0.0));
    assert!(close(end[0], 0.0) && close(end[1], 3.0));
    assert!(doc.panels[0].rotation.is_some());

    for panel in &decoded.panels[2..] {
        assert!(panel.endpoints.is_none());
    }
}

#[test]
fn empty_render_serializes_minimally() {
    let json = JsonRenderEngine::new();
    let binary = BinaryRenderEngine::new();

    assert_eq!(json.to_document().to_json().unwrap(), r#"{"panels":[],"lines":[]}"#);

    let bytes = binary.to_bytes().unwrap();
    assert_eq!(bytes.len(), 16);
    let decoded = decode(&bytes).unwrap();
    assert!(decoded.panels.is_empty());
    assert_eq!(decoded.total_vertex_count, 0);
}

#[test]
fn oversized_id_fails_encode_but_not_json() {
    use gxml_core::RenderSink;

    let long_id = "é".repeat(40_000);
    let mut json = JsonRenderEngine::new();
    let mut binary = BinaryRenderEngine::new();
    for sink in [&mut json as &mut dyn RenderSink, &mut binary] {
        sink.create_poly(&long_id, &[[0.0, 0.0].into()], None).unwrap();
    }

    assert_eq!(json.to_document().panels[0].id.len(), 80_000);
    match binary.to_bytes() {
        Err(WireError::IdTooLong { panel: 0, len, .. }) => assert_eq!(len, 80_000),
        other => panic!("expected IdTooLong, got {:?}", other.map(|b| b.len())),
    }
}
