use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use studio_editor::{commands, EditSession, EditorConfig, NodeDefinition, NodeId, Point};

fn session_with_children(count: usize) -> (EditSession, NodeId, Vec<NodeId>) {
    let config = EditorConfig {
        max_history_levels: 100,
        ..EditorConfig::default()
    };
    let mut session = EditSession::new(config);
    session
        .document_mut()
        .register_definition(NodeDefinition::new("Box"));
    let page = commands::add_page(&mut session).unwrap();

    let nodes: Vec<NodeId> = (0..count)
        .map(|_| session.document_mut().create_node("Box").unwrap())
        .collect();
    commands::insert_nodes(&mut session, page, &nodes, None).unwrap();
    (session, page, nodes)
}

fn insert_undo_redo(c: &mut Criterion) {
    let (mut session, page, nodes) = session_with_children(200);
    let moving = nodes[150];
    let reference = nodes[10];

    c.bench_function("insert_undo_redo", |b| {
        b.iter(|| {
            commands::insert_nodes(&mut session, page, &[moving], Some(reference)).unwrap();
            session.undo();
            session.redo();
            session.undo();
            black_box(session.document().children(page).len())
        })
    });
}

fn batch_remove_undo(c: &mut Criterion) {
    let (mut session, _, nodes) = session_with_children(200);
    let targets: Vec<NodeId> = nodes.iter().copied().step_by(3).collect();

    c.bench_function("batch_remove_undo", |b| {
        b.iter(|| {
            commands::remove_nodes(&mut session, black_box(&targets)).unwrap();
            session.undo();
        })
    });
}

fn prop_edits_at_history_limit(c: &mut Criterion) {
    let (mut session, _, nodes) = session_with_children(10);
    let node = nodes[0];
    let mut counter = 0u64;

    c.bench_function("prop_edits_at_history_limit", |b| {
        b.iter(|| {
            counter += 1;
            commands::set_prop(&mut session, node, "gap", json!(counter)).unwrap();
        })
    });
}

fn page_move_batch(c: &mut Criterion) {
    let mut session = EditSession::default();
    let pages: Vec<NodeId> = (0..50)
        .map(|_| commands::add_page(&mut session).unwrap())
        .collect();

    c.bench_function("page_move_batch", |b| {
        b.iter(|| {
            commands::move_pages(&mut session, &pages, black_box(Point::new(1.0, 1.0))).unwrap();
            session.undo();
        })
    });
}

criterion_group!(
    benches,
    insert_undo_redo,
    batch_remove_undo,
    prop_edits_at_history_limit,
    page_move_batch
);
criterion_main!(benches);
