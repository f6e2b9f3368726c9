use crate::config::EngineConfig;
use crate::diagram::render::{apply_highlights, raise_region};
use crate::diagram::{Circle, CircleId, Color, DrawCommand, RegionKey, RenderPass};
use crate::selection::SelectionState;

fn key(raw: &[u32]) -> RegionKey {
    raw.iter().map(|r| CircleId(*r)).collect()
}

/// A, B, C all overlapping each other, D far away.
fn diagram() -> Vec<Circle> {
    vec![
        Circle::new(CircleId(0), 0.0, 0.0, 10.0),
        Circle::new(CircleId(1), 5.0, 0.0, 10.0),
        Circle::new(CircleId(2), 0.0, 5.0, 10.0),
        Circle::new(CircleId(3), 500.0, 500.0, 10.0),
    ]
}

#[test]
fn test_single_target_highlights_circle_only() {
    let config = EngineConfig::default();
    let mut selection = SelectionState::new();
    selection.choose(key(&[0]), false);

    let pass = RenderPass::run(&diagram(), &selection, &config).unwrap();

    let a = pass.circles.iter().find(|c| c.id == CircleId(0)).unwrap();
    assert_eq!(a.fill, config.highlight_color);
    assert!(pass
        .circles
        .iter()
        .filter(|c| c.id != CircleId(0))
        .all(|c| c.fill == Color::TRANSPARENT));
    assert!(pass.draw_order.iter().all(|o| o.color == config.base_color));
    assert!(pass.unmatched.is_empty());
}

#[test]
fn test_region_target_matches_as_set() {
    let config = EngineConfig::default();
    let mut selection = SelectionState::new();
    selection.choose(key(&[2, 0]), false);

    let pass = RenderPass::run(&diagram(), &selection, &config).unwrap();

    for overlap in &pass.draw_order {
        if overlap.matches(&key(&[0, 2])) {
            assert_eq!(overlap.color, config.highlight_color);
        } else {
            assert_eq!(overlap.color, config.base_color, "{} should stay base", overlap.label());
        }
    }
    assert!(pass.circles.iter().all(|c| c.fill == Color::TRANSPARENT));
    // Enumeration output itself is never highlighted
    assert!(pass.regions.iter().all(|o| o.color == config.base_color));
}

#[test]
fn test_selected_region_draws_last() {
    let config = EngineConfig::default();
    let mut selection = SelectionState::new();
    selection.select_region(Some(key(&[0, 1])));

    let pass = RenderPass::run(&diagram(), &selection, &config).unwrap();
    let labels: Vec<String> = pass.draw_order.iter().map(|o| o.label()).collect();
    assert_eq!(labels, vec!["AC", "BC", "ABC", "AB"]);
    assert_eq!(pass.draw_order.len(), pass.regions.len());

    // Everything before the raised region stays in size order
    let rest = &pass.draw_order[..pass.draw_order.len() - 1];
    assert!(rest.windows(2).all(|w| w[0].len() <= w[1].len()));
}

#[test]
fn test_missing_selected_region_leaves_order_alone() {
    let config = EngineConfig::default();
    let mut selection = SelectionState::new();
    selection.select_region(Some(key(&[0, 3])));

    let pass = RenderPass::run(&diagram(), &selection, &config).unwrap();
    assert_eq!(pass.draw_order, pass.regions);
}

#[test]
fn test_unmatched_targets_are_reported() {
    let config = EngineConfig::default();
    let mut selection = SelectionState::new();
    selection.choose(key(&[0, 3]), true);
    selection.choose(key(&[9]), true);
    selection.choose(key(&[1]), true);

    let pass = RenderPass::run(&diagram(), &selection, &config).unwrap();
    assert_eq!(pass.unmatched, vec![key(&[0, 3]), key(&[9])]);
}

#[test]
fn test_highlight_does_not_leak_between_passes() {
    let config = EngineConfig::default();
    let circles = diagram();
    let mut selection = SelectionState::new();
    selection.choose(key(&[0, 1, 2]), false);
    let first = RenderPass::run(&circles, &selection, &config).unwrap();
    assert_eq!(first.draw_order.last().unwrap().color, config.highlight_color);

    selection.clear();
    let second = RenderPass::run(&circles, &selection, &config).unwrap();
    assert!(second.draw_order.iter().all(|o| o.color == config.base_color));
}

#[test]
fn test_raise_and_highlight_helpers() {
    let config = EngineConfig::default();
    let pass = RenderPass::run(&diagram(), &SelectionState::new(), &config).unwrap();
    let mut overlaps = pass.regions.clone();
    let mut circles = pass.circles.clone();

    assert!(raise_region(&mut overlaps, &key(&[1, 0])));
    assert_eq!(overlaps.last().unwrap().label(), "AB");
    assert!(!raise_region(&mut overlaps, &key(&[2, 3])));

    let targets = vec![key(&[3]), key(&[1, 2])];
    let unmatched = apply_highlights(&mut circles, &mut overlaps, &targets, Color::WHITE);
    assert!(unmatched.is_empty());
    assert_eq!(circles[3].fill, Color::WHITE);
    assert_eq!(overlaps.iter().filter(|o| o.color == Color::WHITE).count(), 1);
}

#[test]
fn test_draw_command_order() {
    let config = EngineConfig::default();
    let circles = vec![
        Circle::new(CircleId(0), 0.0, 0.0, 10.0),
        Circle::new(CircleId(1), 5.0, 0.0, 10.0),
    ];
    let mut selection = SelectionState::new();
    selection.choose(key(&[0, 1]), false);
    let mut selected = circles.clone();
    selected[1].selected = true;

    let frame = RenderPass::run(&selected, &selection, &config)
        .unwrap()
        .into_frame(Vec::new());
    let commands = frame.draw_commands();

    assert_eq!(commands.len(), 1 + 2 + 1 + 2);
    assert_eq!(commands[0], DrawCommand::Clear);
    assert!(matches!(commands[1], DrawCommand::FillCircle { .. }));
    assert!(matches!(commands[2], DrawCommand::FillCircle { .. }));
    match &commands[3] {
        DrawCommand::FillIntersection { clip, color } => {
            assert_eq!(clip.len(), 2);
            assert_eq!(*color, config.highlight_color);
        }
        other => panic!("expected intersection fill, got {:?}", other),
    }
    match (&commands[4], &commands[5]) {
        (
            DrawCommand::StrokeCircle { color: first, width, .. },
            DrawCommand::StrokeCircle { color: second, .. },
        ) => {
            assert_eq!(*first, config.outline_unselected);
            assert_eq!(*second, config.outline_selected);
            assert_eq!(*width, 5.0);
        }
        other => panic!("expected outlines, got {:?}", other),
    }
}

#[test]
fn test_draw_commands_serialize_with_op_tag() {
    let frame = RenderPass::run(&diagram(), &SelectionState::new(), &EngineConfig::default())
        .unwrap()
        .into_frame(Vec::new());
    let json = serde_json::to_value(frame.draw_commands()).unwrap();
    assert_eq!(json[0]["op"], "clear");
    assert_eq!(json[1]["op"], "fill_circle");
}
