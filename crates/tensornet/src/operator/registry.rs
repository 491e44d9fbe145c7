//! Global operator registry keyed by device type and operator type.
//!
//! Backend crates register their operators either by calling [`register`] /
//! [`register_operator`] directly or by adding a registrar function to
//! [`OPERATOR_REGISTRARS`]; linked registrars run once, before the first lookup.

use std::collections::HashMap;
use std::sync::{Arc, Once, OnceLock};

use parking_lot::RwLock;

use super::schema::OpSchema;
use super::Operator;
use crate::config::ExecutorConfig;
use crate::definition::OperatorDef;
use crate::error::{OperatorError, OperatorResult};
use crate::workspace::Workspace;

/// Constructor stored in the registry.
pub type OperatorConstructor =
    fn(&OperatorDef, &Arc<Workspace>, &ExecutorConfig) -> OperatorResult<Box<dyn Operator>>;

/// Operators that can be built from a definition.
///
/// `config` is the configuration of the net being built; operators that compile nested
/// nets pass it on.
pub trait CreateOperator: Operator + Sized + 'static {
    fn create(
        def: &OperatorDef,
        ws: &Arc<Workspace>,
        config: &ExecutorConfig,
    ) -> OperatorResult<Self>;
}

/// Registrar functions collected at link time.
#[linkme::distributed_slice]
pub static OPERATOR_REGISTRARS: [fn()] = [..];

#[derive(Clone, Copy)]
struct OperatorEntry {
    constructor: OperatorConstructor,
    schema: OpSchema,
}

struct OperatorRegistry {
    // device type -> operator type -> entry
    devices: RwLock<HashMap<String, HashMap<String, OperatorEntry>>>,
}

impl OperatorRegistry {
    fn new() -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
        }
    }

    fn register(&self, device: &str, op_type: &str, entry: OperatorEntry) {
        let replaced = self
            .devices
            .write()
            .entry(device.to_string())
            .or_default()
            .insert(op_type.to_string(), entry)
            .is_some();
        if replaced {
            tracing::debug!(device, op_type, "replacing registered operator");
        }
    }

    fn lookup(&self, device: &str, op_type: &str) -> Option<OperatorEntry> {
        self.devices.read().get(device)?.get(op_type).copied()
    }

    fn list(&self, device: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .devices
            .read()
            .get(device)
            .map(|ops| ops.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

static GLOBAL_REGISTRY: OnceLock<OperatorRegistry> = OnceLock::new();
static LINKED_REGISTRARS: Once = Once::new();

fn global_registry() -> &'static OperatorRegistry {
    GLOBAL_REGISTRY.get_or_init(OperatorRegistry::new)
}

fn run_linked_registrars() {
    LINKED_REGISTRARS.call_once(|| {
        for registrar in OPERATOR_REGISTRARS {
            registrar();
        }
    });
}

fn construct<O: CreateOperator>(
    def: &OperatorDef,
    ws: &Arc<Workspace>,
    config: &ExecutorConfig,
) -> OperatorResult<Box<dyn Operator>> {
    Ok(Box::new(O::create(def, ws, config)?))
}

/// Registers a raw constructor for `op_type` on `device`, replacing any previous one.
pub fn register_operator(
    device: &str,
    op_type: &str,
    schema: OpSchema,
    constructor: OperatorConstructor,
) {
    global_registry().register(
        device,
        op_type,
        OperatorEntry {
            constructor,
            schema,
        },
    );
}

/// Registers operator type `O` for `op_type` on `device`.
pub fn register<O: CreateOperator>(device: &str, op_type: &str, schema: OpSchema) {
    register_operator(device, op_type, schema, construct::<O>);
}

/// `true` when `op_type` has a constructor for `device`.
pub fn has_operator(device: &str, op_type: &str) -> bool {
    run_linked_registrars();
    global_registry().lookup(device, op_type).is_some()
}

/// Sorted operator types registered for `device`.
pub fn registered_operators(device: &str) -> Vec<String> {
    run_linked_registrars();
    global_registry().list(device)
}

/// Builds the operator described by `def` inside `ws` with the process-wide
/// [`ExecutorConfig`].
pub fn create_operator(
    def: &OperatorDef,
    ws: &Arc<Workspace>,
) -> OperatorResult<Box<dyn Operator>> {
    create_operator_with_config(def, ws, &ExecutorConfig::default())
}

/// Builds the operator described by `def` inside `ws`.
///
/// The device comes from the definition's device option, falling back to
/// `config.default_device`. Arity is checked against the registered schema before
/// construction.
pub fn create_operator_with_config(
    def: &OperatorDef,
    ws: &Arc<Workspace>,
    config: &ExecutorConfig,
) -> OperatorResult<Box<dyn Operator>> {
    run_linked_registrars();
    let device = match &def.device_option {
        Some(option) => option.device_type.clone(),
        None => config.default_device.clone(),
    };
    let entry = global_registry()
        .lookup(&device, &def.op_type)
        .ok_or_else(|| OperatorError::UnknownOperator {
            op_type: def.op_type.clone(),
            device: device.clone(),
        })?;
    entry.schema.verify(def)?;
    tracing::debug!(
        op_type = def.op_type.as_str(),
        op = def.display_name(),
        device = device.as_str(),
        "creating operator"
    );
    (entry.constructor)(def, ws, config)
}
