use crate::{ActivationEntry, EngineVersion, Registry};

/// Disables installed packages that don't support `engine`. Nothing is removed or reordered.
///
/// Critical packages are left alone. Dependents of a disabled package stay enabled,
/// the broken requirement surfaces as a `requires` problem instead.
pub fn apply_engine_filter(entries: &mut [ActivationEntry], registry: &Registry, engine: &EngineVersion) {
	for entry in entries.iter_mut().filter(|e| e.enabled) {
		let Some(record) = registry.get(&entry.package_id) else { continue };
		if !record.is_critical && !record.supports_engine(engine) {
			log::debug!("Disabling {}, it does not support engine version {}", entry.package_id, engine);
			entry.enabled = false;
		}
	}
}
