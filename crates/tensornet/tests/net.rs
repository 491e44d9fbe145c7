mod common;

use std::path::PathBuf;

use anyhow::Result;
use common::{bool_fill, count_runs, fail, if_op, net, runs, workspace};
use tensornet::config::ExecutorConfig;
use tensornet::context::DeviceOption;
use tensornet::definition::{NetDef, OperatorDef};
use tensornet::net::{create_net, create_net_with_config};
use tensornet::tensor::Tensor;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tensornet-{}-{name}", std::process::id()))
}

#[test]
fn operators_run_in_order() -> Result<()> {
    let ws = workspace();
    let def = net(
        "ordered",
        [
            bool_fill("flag", true),
            OperatorDef::new("Not").input("flag").output("flag"),
            OperatorDef::new("Copy").input("flag").output("snapshot"),
        ],
    );
    let mut net = create_net(&def, &ws)?;
    assert_eq!(net.name(), "ordered");
    assert_eq!(net.num_operators(), 3);
    assert!(net.run()?);

    let snapshot = ws.fetch_blob::<Tensor>("snapshot").expect("snapshot");
    assert_eq!(snapshot.data::<bool>()?, &[false]);
    Ok(())
}

#[test]
fn net_stops_at_first_failure() -> Result<()> {
    let ws = workspace();
    let def = net("stops", [count_runs("before"), fail(), count_runs("after")]);
    let mut net = create_net(&def, &ws)?;

    assert!(!net.run()?);
    assert!(!net.run()?);
    assert_eq!(runs(&ws, "before"), 2);
    assert_eq!(runs(&ws, "after"), 0);
    Ok(())
}

#[test]
fn externals_are_reported() -> Result<()> {
    let ws = workspace();
    ws.feed_blob("cond", Tensor::scalar_bool(true));
    let def = net("branching", [if_op("cond", net("then", [count_runs("hits")]), None)])
        .with_external_input("cond")
        .with_external_output("hits");

    let mut net = create_net(&def, &ws)?;
    assert_eq!(net.external_inputs(), ["cond".to_string()]);
    assert_eq!(net.external_outputs(), ["hits".to_string()]);
    assert!(net.run()?);
    assert_eq!(runs(&ws, "hits"), 1);
    Ok(())
}

#[test]
fn strictness_follows_config() -> Result<()> {
    let ws = workspace();
    let def = NetDef::new("needs_input").with_external_input("absent");

    let strict = ExecutorConfig::default().with_strict_external_inputs(true);
    let err = create_net_with_config(&def, &ws, &strict).err().expect("strict");
    assert_eq!(err.kind(), "missing_blob");

    let lenient = ExecutorConfig::default().with_strict_external_inputs(false);
    assert!(create_net_with_config(&def, &ws, &lenient)?.run()?);
    Ok(())
}

#[test]
fn branches_inherit_the_enclosing_config() -> Result<()> {
    let ws = workspace();
    ws.feed_blob("cond", Tensor::scalar_bool(true));
    let then_net = net("then", [count_runs("hits")]).with_external_input("absent");
    let def = net("outer", [if_op("cond", then_net, None)]);

    let strict = ExecutorConfig::default().with_strict_external_inputs(true);
    let err = create_net_with_config(&def, &ws, &strict).err().expect("strict");
    assert_eq!(err.kind(), "initialization");
    assert!(err.to_string().contains("failed to initialize then subnet"));

    let lenient = ExecutorConfig::default().with_strict_external_inputs(false);
    let mut outer = create_net_with_config(&def, &ws, &lenient)?;
    assert!(outer.run()?);
    assert_eq!(runs(&ws, "hits"), 1);
    Ok(())
}

#[test]
fn net_device_applies_to_its_operators() {
    let ws = workspace();
    let def = net("elsewhere", [bool_fill("flag", true)]).with_device(DeviceOption::new("tpu"));

    let err = create_net(&def, &ws).err().expect("no tpu operators");
    assert_eq!(err.kind(), "unknown_operator");
    assert!(err.to_string().contains("tpu"));
}

#[test]
fn operator_device_overrides_net_device() -> Result<()> {
    let ws = workspace();
    let def = net(
        "mixed",
        [bool_fill("flag", true).device(DeviceOption::new("cpu"))],
    )
    .with_device(DeviceOption::new("tpu"));

    assert!(create_net(&def, &ws)?.run()?);
    Ok(())
}

#[test]
fn unknown_net_type_is_rejected() {
    let ws = workspace();
    let err = create_net(&NetDef::new("async").with_type("async_scheduling"), &ws)
        .err()
        .expect("unsupported type");
    assert_eq!(err.kind(), "unsupported_net_type");
    assert!(err.to_string().contains("async_scheduling"));
}

#[test]
fn definitions_round_trip_through_files() -> Result<()> {
    let ws = workspace();
    ws.feed_blob("cond", Tensor::scalar_bool(false));
    let def = net(
        "persisted",
        [if_op(
            "cond",
            net("then", [count_runs("then_runs")]),
            Some(net("else", [count_runs("else_runs")])),
        )],
    );

    let json = temp_path("net.json");
    def.save_json(&json)?;
    let from_json = NetDef::load_json(&json)?;
    std::fs::remove_file(&json)?;

    let bin = temp_path("net.bin");
    def.save_bincode(&bin)?;
    let from_bincode = NetDef::load_bincode(&bin)?;
    std::fs::remove_file(&bin)?;

    assert_eq!(from_json, def);
    assert_eq!(from_bincode, def);
    assert!(ws.run_net_once(&from_bincode)?);
    assert_eq!(runs(&ws, "else_runs"), 1);
    Ok(())
}
