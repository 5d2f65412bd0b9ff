use anyhow::Result;
use tensorlink::{
    Fetchable, GraphContext, HasNodes, OutputName, RawBuffer, RetrievalEngine, Session, Shape,
};
use tensorlink_engine_mem::MemoryEngine;

fn load_f32(engine: &mut MemoryEngine, name: &str, dims: &[usize], values: &[f32]) -> Result<()> {
    let buffer = RawBuffer::from_values(Shape::new(dims.to_vec()), values)?;
    engine.insert(OutputName::new(name), buffer);
    Ok(())
}

#[test]
fn vector_fetch_decodes_shape_and_values() -> Result<()> {
    let mut engine = MemoryEngine::new();
    load_f32(&mut engine, "logits:0", &[2, 3], &[0.5, 1.0, 1.5, 2.0, 2.5, 3.0])?;

    let session = Session::new(engine);
    let logits = session.context().tensor::<f32>("logits");

    let value = session.run(&logits)?;
    assert_eq!(value.shape().dims(), &[2, 3]);
    assert_eq!(value.values(), &[0.5, 1.0, 1.5, 2.0, 2.5, 3.0]);
    Ok(())
}

#[test]
fn scalar_fetch_returns_the_single_element() -> Result<()> {
    let mut engine = MemoryEngine::new();
    engine.insert(OutputName::new("loss:0"), RawBuffer::scalar(0.25f32));

    let ctx = GraphContext::new();
    let loss = ctx.tensor::<f32>("loss");

    let targets = loss.collect_nodes(&ctx)?;
    let fetch = loss.fetch_scalar(&ctx)?;
    let results = engine.retrieve(&targets, fetch.names())?;
    assert_eq!(fetch.reconstruct(&results)?, 0.25);
    Ok(())
}

#[test]
fn scalar_fetch_rejects_wrong_element_count() -> Result<()> {
    let mut engine = MemoryEngine::new();
    load_f32(&mut engine, "pair:0", &[2], &[1.0, 2.0])?;
    load_f32(&mut engine, "empty:0", &[0], &[])?;

    let ctx = GraphContext::new();
    let pair = ctx.tensor::<f32>("pair");
    let empty = ctx.tensor::<f32>("empty");

    let fetch = pair.fetch_scalar(&ctx)?;
    let results = engine.retrieve(&pair.collect_nodes(&ctx)?, fetch.names())?;
    let err = fetch
        .reconstruct(&results)
        .err()
        .expect("two elements must not decode as a scalar");
    assert!(err.to_string().contains("holds 2"));

    let fetch = empty.fetch_scalar(&ctx)?;
    let results = engine.retrieve(&empty.collect_nodes(&ctx)?, fetch.names())?;
    let err = fetch
        .reconstruct(&results)
        .err()
        .expect("zero elements must not decode as a scalar");
    assert!(err.to_string().contains("holds 0"));
    Ok(())
}

#[test]
fn fetch_values_returns_the_ordered_list() -> Result<()> {
    let mut engine = MemoryEngine::new();
    load_f32(&mut engine, "row:0", &[4], &[4.0, 3.0, 2.0, 1.0])?;

    let ctx = GraphContext::new();
    let row = ctx.tensor::<f32>("row");

    let fetch = row.fetch_values(&ctx)?;
    let results = engine.retrieve(&row.collect_nodes(&ctx)?, fetch.names())?;
    assert_eq!(fetch.reconstruct(&results)?, vec![4.0, 3.0, 2.0, 1.0]);
    Ok(())
}

#[test]
fn dtype_mismatch_reports_both_types() -> Result<()> {
    let mut engine = MemoryEngine::new();
    load_f32(&mut engine, "ids:0", &[2], &[1.0, 2.0])?;

    let ctx = GraphContext::new();
    // Statically typed int32 against a buffer declared float32.
    let ids = ctx.tensor::<i32>("ids");

    let fetch = ids.fetch(&ctx)?;
    let results = engine.retrieve(&ids.collect_nodes(&ctx)?, fetch.names())?;
    let err = fetch
        .reconstruct(&results)
        .err()
        .expect("declared float32 must not decode as int32");
    let message = err.to_string();
    assert!(message.contains("float32"));
    assert!(message.contains("int32"));
    Ok(())
}

#[test]
fn control_fetch_yields_unit_and_requests_nothing() -> Result<()> {
    let session = Session::new(MemoryEngine::new());
    let init = session.context().control("init");

    let fetch = init.fetch(session.context())?;
    assert!(fetch.names().is_empty());

    session.run(&init)?;
    let executed = session.engine().executed();
    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0], init.collect_nodes(session.context())?);
    Ok(())
}

#[test]
fn heterogeneous_tuple_fetch() -> Result<()> {
    let mut engine = MemoryEngine::new();
    load_f32(&mut engine, "probs:0", &[2], &[0.75, 0.25])?;
    engine.insert(
        OutputName::new("count:0"),
        RawBuffer::from_values(Shape::new([1]), &[42i32])?,
    );

    let session = Session::new(engine);
    let probs = session.context().tensor::<f32>("probs");
    let count = session.context().tensor::<i32>("count");
    let init = session.context().control("init");

    let (probs_value, count_value, ()) = session.run(&(probs, count, init))?;
    assert_eq!(probs_value.values(), &[0.75, 0.25]);
    assert_eq!(count_value.values(), &[42]);
    Ok(())
}

#[test]
fn nested_tuple_fetch_rebuilds_the_nesting() -> Result<()> {
    let mut engine = MemoryEngine::new();
    load_f32(&mut engine, "a:0", &[1], &[1.0])?;
    load_f32(&mut engine, "b:0", &[1], &[2.0])?;
    load_f32(&mut engine, "c:0", &[1], &[3.0])?;

    let session = Session::new(engine);
    let a = session.context().tensor::<f32>("a");
    let b = session.context().tensor::<f32>("b");
    let c = session.context().tensor::<f32>("c");

    let ((a_value, b_value), c_value) = session.run(&((a, b), c))?;
    assert_eq!(a_value.values(), &[1.0]);
    assert_eq!(b_value.values(), &[2.0]);
    assert_eq!(c_value.values(), &[3.0]);
    Ok(())
}

#[test]
fn list_fetch_round_trip() -> Result<()> {
    let mut engine = MemoryEngine::new();
    load_f32(&mut engine, "h1:0", &[1], &[1.0])?;
    load_f32(&mut engine, "h2:0", &[1], &[2.0])?;
    load_f32(&mut engine, "h3:0", &[1], &[3.0])?;

    let ctx = GraphContext::new();
    let handles = vec![
        ctx.tensor::<f32>("h1"),
        ctx.tensor::<f32>("h2"),
        ctx.tensor::<f32>("h3"),
    ];

    let fetch = handles.fetch(&ctx)?;
    let union: std::collections::BTreeSet<_> = handles
        .iter()
        .map(|handle| handle.fetch(&ctx).map(|d| d.names().clone()))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(fetch.names(), &union);

    let results = engine.retrieve(&handles.collect_nodes(&ctx)?, fetch.names())?;
    let values = fetch.reconstruct(&results)?;
    let flat: Vec<f32> = values.iter().flat_map(|v| v.values().to_vec()).collect();
    assert_eq!(flat, vec![1.0, 2.0, 3.0]);
    Ok(())
}

#[test]
fn shared_handle_is_requested_once() -> Result<()> {
    let mut engine = MemoryEngine::new();
    load_f32(&mut engine, "shared:0", &[1], &[7.0])?;

    let session = Session::new(engine);
    let shared = session.context().tensor::<f32>("shared");

    let fetch = (shared, shared).fetch(session.context())?;
    assert_eq!(fetch.names().len(), 1);

    let (left, right) = session.run(&(shared, shared))?;
    assert_eq!(left, right);
    assert_eq!(left.values(), &[7.0]);
    Ok(())
}

#[test]
fn missing_buffer_fails_the_whole_retrieval() -> Result<()> {
    let mut engine = MemoryEngine::new();
    load_f32(&mut engine, "present:0", &[1], &[1.0])?;

    let ctx = GraphContext::new();
    let present = ctx.tensor::<f32>("present");
    let absent = ctx.tensor::<f32>("absent");

    let fetch = (present, absent).fetch(&ctx)?;
    let err = engine
        .retrieve(&(present, absent).collect_nodes(&ctx)?, fetch.names())
        .err()
        .expect("a missing buffer must fail the whole retrieval");
    assert!(err.to_string().contains("holds no buffer named `absent:0`"));
    assert_eq!(engine.runs(), 0);
    Ok(())
}
