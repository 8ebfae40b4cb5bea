use super::{AssetError, AssetKind, Attributes, InlinePosition, WebAssetItem, WebAssetRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

/// How an asset became active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetState {
    /// Enabled directly through `use_asset`.
    Active,
    /// Enabled because another active asset depends on it.
    Dependency,
}

/// Inline assets attached to one file asset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineRelation {
    pub before: Vec<WebAssetItem>,
    pub after: Vec<WebAssetItem>,
}

/// Serializable snapshot of the manager, used by head data get/set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerState {
    pub registry_files: Vec<PathBuf>,
    pub assets: BTreeMap<AssetKind, Vec<WebAssetItem>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Per-document view over the registry: which assets are switched on.
#[derive(Debug, Clone, Default)]
pub struct WebAssetManager {
    registry: WebAssetRegistry,
    active: BTreeMap<AssetKind, Vec<(String, AssetState)>>,
}

impl WebAssetManager {
    pub fn new(registry: WebAssetRegistry) -> Self {
        Self {
            registry,
            active: BTreeMap::new(),
        }
    }

    pub fn registry(&self) -> &WebAssetRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut WebAssetRegistry {
        &mut self.registry
    }

    pub fn register_asset(&mut self, item: WebAssetItem) {
        self.registry.add(item);
    }

    pub fn get_asset(&self, kind: AssetKind, name: &str) -> Option<&WebAssetItem> {
        self.registry.get(kind, name)
    }

    pub fn asset_exists(&self, kind: AssetKind, name: &str) -> bool {
        self.registry.exists(kind, name)
    }

    pub fn is_asset_active(&self, kind: AssetKind, name: &str) -> bool {
        self.asset_state(kind, name).is_some()
    }

    pub fn asset_state(&self, kind: AssetKind, name: &str) -> Option<AssetState> {
        self.active
            .get(&kind)?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, state)| *state)
    }

    /// Enable an asset.
    ///
    /// Dependencies of another kind (`name#kind`) are enabled right away;
    /// same-kind dependencies are resolved by [`get_assets`](Self::get_assets).
    /// Presets enable every dependency, including nested presets.
    pub fn use_asset(&mut self, kind: AssetKind, name: &str) -> Result<(), AssetError> {
        self.enable(kind, name, AssetState::Active)
    }

    pub fn use_preset(&mut self, name: &str) -> Result<(), AssetError> {
        self.use_asset(AssetKind::Preset, name)
    }

    fn enable(&mut self, kind: AssetKind, name: &str, state: AssetState) -> Result<(), AssetError> {
        let item = self
            .registry
            .get(kind, name)
            .ok_or_else(|| AssetError::UnknownAsset {
                kind,
                name: name.to_string(),
            })?;
        let dependencies: Vec<(AssetKind, String)> = item
            .dependency_refs()?
            .into_iter()
            .filter(|(dep_kind, _)| kind == AssetKind::Preset || *dep_kind != kind)
            .map(|(dep_kind, dep)| (dep_kind, dep.to_string()))
            .collect();

        let list = self.active.entry(kind).or_default();
        if let Some(entry) = list.iter_mut().find(|(n, _)| n == name) {
            if state == AssetState::Active {
                entry.1 = AssetState::Active;
            }
            return Ok(());
        }
        list.push((name.to_string(), state));
        tracing::debug!(%kind, name, ?state, "asset enabled");

        for (dep_kind, dep) in dependencies {
            self.enable(dep_kind, &dep, AssetState::Dependency)?;
        }
        Ok(())
    }

    /// Switch an asset off. Returns whether it was active.
    ///
    /// Assets that were only enabled as its dependencies are switched off
    /// too, unless another active asset still needs them.
    pub fn disable_asset(&mut self, kind: AssetKind, name: &str) -> bool {
        let Some(list) = self.active.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(n, _)| n != name);
        if before == list.len() {
            return false;
        }

        let reachable = self.reachable_dependencies();
        for (list_kind, list) in self.active.iter_mut() {
            list.retain(|(n, state)| {
                let keep = *state == AssetState::Active || reachable.contains(&(*list_kind, n.clone()));
                if !keep {
                    tracing::debug!(kind = %list_kind, name = %n, "orphaned dependency disabled");
                }
                keep
            });
        }
        tracing::debug!(%kind, name, "asset disabled");
        true
    }

    /// Assets switched on by following the dependencies of active assets,
    /// using the same rules as [`use_asset`](Self::use_asset).
    fn reachable_dependencies(&self) -> HashSet<(AssetKind, String)> {
        let mut stack: Vec<(AssetKind, String)> = self
            .active
            .iter()
            .flat_map(|(kind, list)| {
                list.iter()
                    .filter(|(_, state)| *state == AssetState::Active)
                    .map(move |(name, _)| (*kind, name.clone()))
            })
            .collect();
        let mut reached = HashSet::new();
        while let Some((kind, name)) = stack.pop() {
            let Some(item) = self.registry.get(kind, &name) else {
                continue;
            };
            let Ok(refs) = item.dependency_refs() else {
                continue;
            };
            for (dep_kind, dep) in refs {
                if kind != AssetKind::Preset && dep_kind == kind {
                    continue;
                }
                if reached.insert((dep_kind, dep.to_string())) {
                    stack.push((dep_kind, dep.to_string()));
                }
            }
        }
        reached
    }

    pub fn register_and_use_script(
        &mut self,
        name: &str,
        uri: &str,
        attributes: Attributes,
        dependencies: &[&str],
    ) -> Result<(), AssetError> {
        self.register_and_use(AssetKind::Script, name, uri, attributes, dependencies)
    }

    pub fn register_and_use_style(
        &mut self,
        name: &str,
        uri: &str,
        attributes: Attributes,
        dependencies: &[&str],
    ) -> Result<(), AssetError> {
        self.register_and_use(AssetKind::Style, name, uri, attributes, dependencies)
    }

    fn register_and_use(
        &mut self,
        kind: AssetKind,
        name: &str,
        uri: &str,
        attributes: Attributes,
        dependencies: &[&str],
    ) -> Result<(), AssetError> {
        let mut item = WebAssetItem::new(kind, name).with_uri(uri);
        item.attributes = attributes;
        item.dependencies = dependencies.iter().map(|d| d.to_string()).collect();
        self.registry.add(item);
        self.use_asset(kind, name)
    }

    /// Register and enable an inline script. Returns the asset name.
    pub fn add_inline_script(
        &mut self,
        content: &str,
        options: Attributes,
        attributes: Attributes,
        dependencies: &[&str],
    ) -> Result<String, AssetError> {
        self.add_inline(AssetKind::Script, content, options, attributes, dependencies)
    }

    /// Register and enable an inline style. Returns the asset name.
    pub fn add_inline_style(
        &mut self,
        content: &str,
        options: Attributes,
        attributes: Attributes,
        dependencies: &[&str],
    ) -> Result<String, AssetError> {
        self.add_inline(AssetKind::Style, content, options, attributes, dependencies)
    }

    fn add_inline(
        &mut self,
        kind: AssetKind,
        content: &str,
        mut options: Attributes,
        attributes: Attributes,
        dependencies: &[&str],
    ) -> Result<String, AssetError> {
        let name = match options.remove("name") {
            Some(Value::String(name)) if !name.is_empty() => name,
            _ => {
                let digest = format!("{:x}", Sha256::digest(content.as_bytes()));
                format!("inline.{}", &digest[..16])
            }
        };
        options.insert("inline".into(), Value::Bool(true));
        options.insert("content".into(), Value::String(content.to_string()));

        let mut item = WebAssetItem::new(kind, name.clone());
        item.options = options;
        item.attributes = attributes;
        item.dependencies = dependencies.iter().map(|d| d.to_string()).collect();
        self.registry.add(item);
        self.use_asset(kind, &name)?;
        Ok(name)
    }

    /// Active assets of `kind` together with their same-kind dependencies.
    ///
    /// With `sorted`, every asset comes after all of its dependencies and the
    /// activation order is kept otherwise. Without it, directly used assets
    /// come first in activation order, followed by assets pulled in as
    /// dependencies.
    pub fn get_assets(&self, kind: AssetKind, sorted: bool) -> Result<Vec<WebAssetItem>, AssetError> {
        let roots = self.active.get(&kind).map(Vec::as_slice).unwrap_or_default();
        let mut marks: HashMap<String, Mark> = HashMap::new();
        let mut stack: Vec<String> = Vec::new();
        let mut order: Vec<String> = Vec::new();

        for (name, _) in roots {
            self.visit(kind, name, None, &mut marks, &mut stack, &mut order)?;
        }

        let names: Vec<&String> = if sorted {
            order.iter().collect()
        } else {
            let mut names: Vec<&String> = roots.iter().map(|(n, _)| n).collect();
            names.extend(order.iter().filter(|n| !roots.iter().any(|(r, _)| r == *n)));
            names
        };

        Ok(names
            .into_iter()
            .filter_map(|name| self.registry.get(kind, name).cloned())
            .collect())
    }

    fn visit(
        &self,
        kind: AssetKind,
        name: &str,
        parent: Option<&str>,
        marks: &mut HashMap<String, Mark>,
        stack: &mut Vec<String>,
        order: &mut Vec<String>,
    ) -> Result<(), AssetError> {
        match marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = stack.iter().position(|n| n == name).unwrap_or(0);
                let mut chain = stack[start..].to_vec();
                chain.push(name.to_string());
                return Err(AssetError::CircularDependency { kind, chain });
            }
            None => {}
        }

        let item = self.registry.get(kind, name).ok_or_else(|| match parent {
            Some(parent) => AssetError::UnsatisfiedDependency {
                kind,
                name: parent.to_string(),
                dependency: name.to_string(),
            },
            None => AssetError::UnknownAsset {
                kind,
                name: name.to_string(),
            },
        })?;

        marks.insert(name.to_string(), Mark::Visiting);
        stack.push(name.to_string());
        for (dep_kind, dep) in item.dependency_refs()? {
            if dep_kind == kind {
                self.visit(kind, dep, Some(name), marks, stack, order)?;
            }
        }
        stack.pop();
        marks.insert(name.to_string(), Mark::Done);
        order.push(name.to_string());
        Ok(())
    }

    /// Remove inline assets from `assets` and return them, order preserved.
    pub fn filter_out_inline_assets(assets: &mut Vec<WebAssetItem>) -> Vec<WebAssetItem> {
        let (inline, files): (Vec<_>, Vec<_>) =
            std::mem::take(assets).into_iter().partition(WebAssetItem::is_inline);
        *assets = files;
        inline
    }

    /// Group inline assets by the file asset they are positioned against.
    ///
    /// The target is the last dependency of each inline asset. Inline assets
    /// without a position, without dependencies, whose last dependency is of
    /// another kind, or whose target is itself inline are left unrelated.
    pub fn get_inline_relation(&self, inline: &[WebAssetItem]) -> HashMap<String, InlineRelation> {
        let mut relations: HashMap<String, InlineRelation> = HashMap::new();
        for asset in inline {
            let Some(position) = asset.position() else {
                continue;
            };
            let Some(target) = asset.dependencies.last() else {
                continue;
            };
            if target.contains('#') {
                let same_kind = target
                    .split_once('#')
                    .and_then(|(_, k)| k.parse::<AssetKind>().ok())
                    .is_some_and(|k| k == asset.kind);
                if !same_kind {
                    continue;
                }
            }
            let target = target.split('#').next().unwrap_or(target);
            if self
                .registry
                .get(asset.kind, target)
                .is_some_and(WebAssetItem::is_inline)
            {
                continue;
            }
            let relation = relations.entry(target.to_string()).or_default();
            match position {
                InlinePosition::Before => relation.before.push(asset.clone()),
                InlinePosition::After => relation.after.push(asset.clone()),
            }
        }
        relations
    }

    /// Snapshot of the loaded registry files and the directly used assets.
    ///
    /// Assets enabled only as dependencies are left out; restoring the
    /// snapshot enables them again.
    pub fn manager_state(&self) -> ManagerState {
        let assets = self
            .active
            .iter()
            .map(|(kind, names)| {
                let items: Vec<WebAssetItem> = names
                    .iter()
                    .filter(|(_, state)| *state == AssetState::Active)
                    .filter_map(|(name, _)| self.registry.get(*kind, name).cloned())
                    .collect();
                (*kind, items)
            })
            .filter(|(_, items)| !items.is_empty())
            .collect();
        ManagerState {
            registry_files: self.registry.registry_files().to_vec(),
            assets,
        }
    }

    /// Re-register and re-enable everything in a snapshot.
    pub fn restore_state(&mut self, state: &ManagerState) -> Result<(), AssetError> {
        for path in &state.registry_files {
            self.registry.add_registry_file(path)?;
        }
        for items in state.assets.values() {
            for item in items {
                self.registry.add(item.clone());
            }
        }
        for (kind, items) in &state.assets {
            for item in items {
                self.use_asset(*kind, &item.name)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(items: &[WebAssetItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    fn manager() -> WebAssetManager {
        let mut registry = WebAssetRegistry::default();
        registry.add(WebAssetItem::script("core", "media/core.js"));
        registry.add(WebAssetItem::script("polyfill", "media/polyfill.js"));
        registry.add(
            WebAssetItem::script("fields", "media/fields.js")
                .with_dependency("core")
                .with_dependency("polyfill"),
        );
        registry.add(WebAssetItem::style("theme", "media/theme.css"));
        registry.add(
            WebAssetItem::new(AssetKind::Preset, "editor")
                .with_dependency("fields#script")
                .with_dependency("theme#style"),
        );
        WebAssetManager::new(registry)
    }

    #[test]
    fn use_unknown_asset_fails() {
        let mut wam = manager();
        let err = wam.use_asset(AssetKind::Script, "missing").unwrap_err();
        assert!(matches!(err, AssetError::UnknownAsset { .. }));
    }

    #[test]
    fn sorted_puts_dependencies_first() {
        let mut wam = manager();
        wam.use_asset(AssetKind::Script, "fields").unwrap();
        let sorted = wam.get_assets(AssetKind::Script, true).unwrap();
        assert_eq!(names(&sorted), ["core", "polyfill", "fields"]);
        let unsorted = wam.get_assets(AssetKind::Script, false).unwrap();
        assert_eq!(names(&unsorted), ["fields", "core", "polyfill"]);
    }

    #[test]
    fn sorted_keeps_activation_order_for_independent_assets() {
        let mut wam = manager();
        wam.use_asset(AssetKind::Script, "polyfill").unwrap();
        wam.use_asset(AssetKind::Script, "core").unwrap();
        let sorted = wam.get_assets(AssetKind::Script, true).unwrap();
        assert_eq!(names(&sorted), ["polyfill", "core"]);
    }

    #[test]
    fn preset_enables_cross_kind_dependencies() {
        let mut wam = manager();
        wam.use_preset("editor").unwrap();
        assert_eq!(wam.asset_state(AssetKind::Preset, "editor"), Some(AssetState::Active));
        assert_eq!(
            wam.asset_state(AssetKind::Script, "fields"),
            Some(AssetState::Dependency)
        );
        assert!(wam.is_asset_active(AssetKind::Style, "theme"));
        let scripts = wam.get_assets(AssetKind::Script, true).unwrap();
        assert_eq!(names(&scripts), ["core", "polyfill", "fields"]);
    }

    #[test]
    fn explicit_use_upgrades_dependency_state() {
        let mut wam = manager();
        wam.use_preset("editor").unwrap();
        wam.use_asset(AssetKind::Style, "theme").unwrap();
        assert_eq!(wam.asset_state(AssetKind::Style, "theme"), Some(AssetState::Active));
    }

    #[test]
    fn unsatisfied_dependency_is_reported() {
        let mut wam = manager();
        wam.register_and_use_script("app", "app.js", Attributes::new(), &["router"])
            .unwrap();
        let err = wam.get_assets(AssetKind::Script, true).unwrap_err();
        match err {
            AssetError::UnsatisfiedDependency { name, dependency, .. } => {
                assert_eq!(name, "app");
                assert_eq!(dependency, "router");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn circular_dependency_is_reported() {
        let mut wam = WebAssetManager::default();
        wam.register_asset(WebAssetItem::script("a", "a.js").with_dependency("b"));
        wam.register_asset(WebAssetItem::script("b", "b.js").with_dependency("a"));
        wam.use_asset(AssetKind::Script, "a").unwrap();
        let err = wam.get_assets(AssetKind::Script, true).unwrap_err();
        match err {
            AssetError::CircularDependency { chain, .. } => assert_eq!(chain, ["a", "b", "a"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn disable_asset_removes_it() {
        let mut wam = manager();
        wam.use_asset(AssetKind::Script, "core").unwrap();
        assert!(wam.disable_asset(AssetKind::Script, "core"));
        assert!(!wam.disable_asset(AssetKind::Script, "core"));
        assert!(wam.get_assets(AssetKind::Script, true).unwrap().is_empty());
    }

    #[test]
    fn disable_preset_drops_its_dependencies() {
        let mut wam = manager();
        wam.use_preset("editor").unwrap();
        assert!(wam.disable_asset(AssetKind::Preset, "editor"));
        assert!(!wam.is_asset_active(AssetKind::Script, "fields"));
        assert!(!wam.is_asset_active(AssetKind::Style, "theme"));
        assert!(wam.get_assets(AssetKind::Script, true).unwrap().is_empty());
        assert!(wam.get_assets(AssetKind::Style, true).unwrap().is_empty());
    }

    #[test]
    fn disable_keeps_dependencies_still_needed() {
        let mut wam = manager();
        wam.register_asset(
            WebAssetItem::script("toolbar", "media/toolbar.js").with_dependency("theme#style"),
        );
        wam.use_preset("editor").unwrap();
        wam.use_asset(AssetKind::Script, "toolbar").unwrap();
        wam.use_asset(AssetKind::Script, "fields").unwrap();

        wam.disable_asset(AssetKind::Preset, "editor");
        assert_eq!(wam.asset_state(AssetKind::Script, "fields"), Some(AssetState::Active));
        assert_eq!(wam.asset_state(AssetKind::Style, "theme"), Some(AssetState::Dependency));

        wam.disable_asset(AssetKind::Script, "toolbar");
        assert!(!wam.is_asset_active(AssetKind::Style, "theme"));
        assert!(wam.is_asset_active(AssetKind::Script, "fields"));
    }

    #[test]
    fn inline_assets_get_hashed_names() {
        let mut wam = manager();
        let name = wam
            .add_inline_script("alert(1)", Attributes::new(), Attributes::new(), &[])
            .unwrap();
        assert!(name.starts_with("inline."));
        let again = wam
            .add_inline_script("alert(1)", Attributes::new(), Attributes::new(), &[])
            .unwrap();
        assert_eq!(name, again);
        let item = wam.get_asset(AssetKind::Script, &name).unwrap();
        assert!(item.is_inline());
        assert_eq!(item.content(), Some("alert(1)"));
    }

    #[test]
    fn inline_asset_can_be_named() {
        let mut wam = manager();
        let mut options = Attributes::new();
        options.insert("name".into(), json!("boot"));
        let name = wam
            .add_inline_style("body{}", options, Attributes::new(), &[])
            .unwrap();
        assert_eq!(name, "boot");
        assert!(wam.get_asset(AssetKind::Style, "boot").unwrap().option("name").is_none());
    }

    #[test]
    fn filter_out_inline_keeps_order() {
        let mut wam = manager();
        wam.use_asset(AssetKind::Script, "core").unwrap();
        wam.add_inline_script("one()", Attributes::new(), Attributes::new(), &[])
            .unwrap();
        wam.use_asset(AssetKind::Script, "polyfill").unwrap();
        wam.add_inline_script("two()", Attributes::new(), Attributes::new(), &[])
            .unwrap();

        let mut assets = wam.get_assets(AssetKind::Script, true).unwrap();
        let inline = WebAssetManager::filter_out_inline_assets(&mut assets);
        assert_eq!(names(&assets), ["core", "polyfill"]);
        let contents: Vec<_> = inline.iter().filter_map(WebAssetItem::content).collect();
        assert_eq!(contents, ["one()", "two()"]);
    }

    #[test]
    fn inline_relation_targets_last_dependency() {
        let mut wam = manager();
        let mut before = Attributes::new();
        before.insert("position".into(), json!("before"));
        let mut after = Attributes::new();
        after.insert("position".into(), json!("after"));
        wam.add_inline_script("pre()", before, Attributes::new(), &["polyfill", "core"])
            .unwrap();
        wam.add_inline_script("post()", after, Attributes::new(), &["core"])
            .unwrap();
        wam.add_inline_script("loose()", Attributes::new(), Attributes::new(), &["core"])
            .unwrap();

        let mut assets = wam.get_assets(AssetKind::Script, true).unwrap();
        let inline = WebAssetManager::filter_out_inline_assets(&mut assets);
        let relations = wam.get_inline_relation(&inline);
        assert_eq!(relations.len(), 1);
        let core = &relations["core"];
        assert_eq!(core.before[0].content(), Some("pre()"));
        assert_eq!(core.after[0].content(), Some("post()"));
    }

    #[test]
    fn inline_relation_ignores_inline_and_foreign_targets() {
        let mut wam = manager();
        let mut first = Attributes::new();
        first.insert("name".into(), json!("first"));
        wam.add_inline_script("a()", first, Attributes::new(), &[]).unwrap();
        let mut chained = Attributes::new();
        chained.insert("position".into(), json!("after"));
        wam.add_inline_script("b()", chained.clone(), Attributes::new(), &["first"])
            .unwrap();
        wam.add_inline_script("c()", chained, Attributes::new(), &["theme#style"])
            .unwrap();

        let mut assets = wam.get_assets(AssetKind::Script, true).unwrap();
        let inline = WebAssetManager::filter_out_inline_assets(&mut assets);
        assert!(wam.get_inline_relation(&inline).is_empty());
    }

    #[test]
    fn manager_state_round_trips_through_restore() {
        let mut wam = manager();
        wam.use_preset("editor").unwrap();
        wam.use_asset(AssetKind::Script, "core").unwrap();
        let state = wam.manager_state();
        assert_eq!(names(&state.assets[&AssetKind::Script]), ["core"]);
        assert_eq!(names(&state.assets[&AssetKind::Preset]), ["editor"]);
        assert!(!state.assets.contains_key(&AssetKind::Style));

        let mut fresh = manager();
        fresh.restore_state(&state).unwrap();
        assert!(fresh.is_asset_active(AssetKind::Style, "theme"));
        assert!(fresh.is_asset_active(AssetKind::Script, "fields"));
    }
}
