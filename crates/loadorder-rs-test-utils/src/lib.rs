//! Various helper functions for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use loadorder_rs::*;

/// A small catalog modelled on a typical modded install, as the external loader would emit it.
pub const SAMPLE_CATALOG: &str = r#"[
	{
		"packageId": "brrainz.harmony",
		"name": "Harmony",
		"supportedVersions": ["1.2", "1.3"],
		"loadBefore": ["Ludeon.RimWorld"]
	},
	{
		"packageId": "me.samboycoding.betterloading",
		"name": "BetterLoading",
		"supportedVersions": ["1.0", "1.1", "1.2", "1.3"],
		"requires": ["brrainz.harmony"],
		"loadBefore": ["core >= 1.0", "startupimpact", "ludeon.rimworld", "unlimitedhugs.hugslib", "automatic.startupimpact"],
		"loadAfter": ["brrainz.harmony"]
	},
	{
		"packageId": "ludeon.rimworld",
		"name": "Core",
		"loadBefore": ["ludeon.rimworld.ideology", "ludeon.rimworld.royalty"]
	},
	{
		"packageId": "ludeon.rimworld.ideology",
		"name": "Ideology",
		"supportedVersions": ["1.3"],
		"requires": ["ludeon.rimworld"],
		"loadAfter": ["ludeon.rimworld.royalty"]
	},
	{
		"packageId": "unlimitedhugs.hugslib",
		"name": "HugsLib",
		"supportedVersions": ["1.0", "1.1", "1.2", "1.3"],
		"requires": ["brrainz.harmony"],
		"loadAfter": ["ludeon.rimworld", "ludeon.rimworld.royalty", "brrainz.harmony"]
	},
	{
		"packageId": "fluffy.modmanager",
		"name": "Mod Manager",
		"supportedVersions": ["1.0", "1.1", "1.2", "1.3"],
		"requires": ["brrainz.harmony", "ludeon.rimworld"],
		"loadAfter": ["brrainz.harmony"]
	},
	{ "packageId": "standalone.a", "name": "Standalone A" },
	{ "packageId": "standalone.b", "name": "Standalone B" },
	{ "packageId": "legacy.mod", "name": "Legacy Mod", "supportedVersions": ["1.0"] },
	{ "packageId": "badmod.liba", "name": "Bad Mod A", "requires": ["badmod.libb"] },
	{ "packageId": "badmod.libb", "name": "Bad Mod B", "requires": ["badmod.liba"] },
	{ "packageId": "rival.d", "name": "Rival D", "incompatibleWith": ["rival.e"] },
	{ "packageId": "rival.e", "name": "Rival E", "incompatibleWith": ["rival.d"] },
	{ "packageId": "needs.ghost", "name": "Needs Ghost", "requires": ["ghost"] }
]"#;

/// Engine version the sample catalog is written against.
pub const SAMPLE_ENGINE: &str = "1.3";

/// Gets a registry built from [`SAMPLE_CATALOG`] with the default config.
pub fn get_registry() -> Result<Registry> {
	let config = ResolverConfig::default();
	let records = load_catalog(SAMPLE_CATALOG.as_bytes(), &config)?;
	Ok(Registry::build(records, &config))
}

/// Builds a sequence from ids, every id enabled unless given as a `(id, false)` tuple.
pub fn make_list<'a>(ids: impl IntoIterator<Item = (&'a str, bool)>) -> ActivationSequence {
	ActivationSequence::from_entries(ids.into_iter().map(|(id, enabled)| ActivationEntry::new(id, enabled)))
}

/// Builds a fully enabled sequence.
pub fn enabled_list<'a>(ids: impl IntoIterator<Item = &'a str>) -> ActivationSequence {
	ActivationSequence::from_enabled_ids(ids)
}

/// Flattens a sequence into comparable tuples.
pub fn as_tuples(seq: &ActivationSequence) -> Vec<(String, bool)> {
	seq.entries().iter().map(|e| (e.package_id.clone(), e.enabled)).collect()
}
