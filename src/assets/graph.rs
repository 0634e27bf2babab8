// Dependency graph construction
//
// One pass over the registry in declaration order wires every requirement
// into a reverse "notify on load" edge and collects the assets that can start
// right away.

use super::config::LoaderConfig;
use super::handle::NodeRef;
use super::registry::AssetRegistry;
use super::LoaderError;
use log::{debug, warn};
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Wire requirements and group memberships, returning the ready list
///
/// A requirement resolves to an asset if one has that id, otherwise to a
/// group (created on first mention). An asset id always shadows a group of
/// the same name.
pub fn build_graph(
    registry: &mut AssetRegistry,
    config: &LoaderConfig,
) -> Result<Vec<String>, LoaderError> {
    let mut ready = Vec::new();

    for id in registry.asset_ids() {
        let (requires, groups) = match registry.get_mut(&id) {
            Some(record) => {
                record.notify_on_load.clear();
                record.satisfied_requirements.clear();
                (
                    record.requires().to_vec(),
                    record.member_of_groups().to_vec(),
                )
            }
            None => continue,
        };

        if requires.is_empty() {
            ready.push(id.clone());
        }

        for required in &requires {
            if let Some(target) = registry.get_mut(required) {
                target.notify_on_load.push(id.clone());
            } else {
                registry
                    .ensure_group(required)
                    .notify_on_load
                    .push(id.clone());
            }
        }

        for group in &groups {
            registry.ensure_group(group).members.push(id.clone());
        }
    }

    if ready.is_empty() && !registry.is_empty() {
        return Err(LoaderError::NoEntryPoint);
    }

    check_groups(registry, config)?;

    if config.detect_cycles {
        detect_cycles(registry)?;
    }

    debug!(
        "Dependency graph built: {} assets, {} groups, {} ready",
        registry.len(),
        registry.group_count(),
        ready.len()
    );

    Ok(ready)
}

/// Required groups must have at least one member or they can never satisfy
fn check_groups(registry: &AssetRegistry, config: &LoaderConfig) -> Result<(), LoaderError> {
    let empty = registry
        .groups()
        .find(|group| group.members().is_empty() && !group.notify_on_load().is_empty());

    let Some(group) = empty else {
        return Ok(());
    };

    if config.require_group_members {
        return Err(LoaderError::EmptyGroup {
            group: group.id().to_string(),
            dependents: group.notify_on_load().to_vec(),
        });
    }

    for group in registry
        .groups()
        .filter(|group| group.members().is_empty() && !group.notify_on_load().is_empty())
    {
        warn!(
            "Group '{}' has no members; {} will never load",
            group.id(),
            group.notify_on_load().join(", ")
        );
    }

    Ok(())
}

/// Reject manifests whose requirements loop back on themselves
///
/// Assets and groups are both graph nodes: a requirement is an edge from the
/// required node to the requiring asset, a membership is an edge from the
/// member asset to its group.
pub fn detect_cycles(registry: &AssetRegistry) -> Result<(), LoaderError> {
    let mut nodes: Vec<NodeRef> = registry
        .assets()
        .map(|asset| NodeRef::asset(asset.id()))
        .collect();
    nodes.extend(registry.groups().map(|group| NodeRef::group(group.id())));

    let mut edges = Vec::new();
    for asset in registry.assets() {
        for required in asset.requires() {
            let from = if registry.contains_asset(required) {
                NodeRef::asset(required.as_str())
            } else {
                NodeRef::group(required.as_str())
            };
            edges.push((from, NodeRef::asset(asset.id())));
        }
        for group in asset.member_of_groups() {
            edges.push((NodeRef::asset(asset.id()), NodeRef::group(group.as_str())));
        }
    }

    match topological_order(nodes, edges) {
        Ok(_) => Ok(()),
        Err(blocked) => Err(LoaderError::Cycle {
            assets: blocked
                .into_iter()
                .filter(NodeRef::is_asset)
                .map(|node| node.id().to_string())
                .collect(),
        }),
    }
}

/// Kahn's algorithm. On failure returns the nodes that could not be ordered,
/// in their original order.
fn topological_order<T>(
    nodes: impl IntoIterator<Item = T>,
    edges: impl IntoIterator<Item = (T, T)>,
) -> Result<Vec<T>, Vec<T>>
where
    T: Clone + Eq + Hash,
{
    let node_list: Vec<T> = nodes.into_iter().collect();
    if node_list.is_empty() {
        return Ok(Vec::new());
    }

    let mut adjacency: HashMap<T, Vec<T>> = HashMap::new();
    let mut in_degree: HashMap<T, usize> = node_list.iter().map(|n| (n.clone(), 0)).collect();

    for (parent, child) in edges {
        if let Some(degree) = in_degree.get_mut(&child) {
            *degree += 1;
        }
        adjacency.entry(parent).or_default().push(child);
    }

    let mut queue: VecDeque<T> = node_list
        .iter()
        .filter(|n| in_degree.get(*n).copied().unwrap_or(0) == 0)
        .cloned()
        .collect();

    let mut sorted = Vec::with_capacity(node_list.len());
    while let Some(parent) = queue.pop_front() {
        if let Some(children) = adjacency.get(&parent) {
            for child in children {
                if let Some(degree) = in_degree.get_mut(child) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(child.clone());
                    }
                }
            }
        }
        sorted.push(parent);
    }

    if sorted.len() == node_list.len() {
        Ok(sorted)
    } else {
        Err(node_list
            .into_iter()
            .filter(|n| in_degree.get(n).copied().unwrap_or(0) > 0)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::manifest::{AssetDecl, Manifest};

    fn build(manifest: &Manifest) -> (AssetRegistry, Result<Vec<String>, LoaderError>) {
        let mut registry = AssetRegistry::from_manifest(manifest);
        let result = build_graph(&mut registry, &LoaderConfig::default());
        (registry, result)
    }

    #[test]
    fn test_ready_list_in_declaration_order() {
        let manifest = Manifest::new()
            .with("c", AssetDecl::script("/c.js"))
            .with("b", AssetDecl::script("/b.js").requires("c"))
            .with("a", AssetDecl::image("/a.png"));

        let (_, ready) = build(&manifest);
        assert_eq!(ready.unwrap(), vec!["c", "a"]);
    }

    #[test]
    fn test_requirements_become_reverse_edges() {
        let manifest = Manifest::new()
            .with("a", AssetDecl::script("/a.js"))
            .with("b", AssetDecl::script("/b.js").requires("a"))
            .with("c", AssetDecl::script("/c.js").requires("a"));

        let (registry, _) = build(&manifest);
        assert_eq!(
            registry.get("a").unwrap().notify_on_load(),
            &["b".to_string(), "c".to_string()]
        );
        assert!(registry.get("b").unwrap().notify_on_load().is_empty());
    }

    #[test]
    fn test_groups_created_lazily() {
        let manifest = Manifest::new()
            .with("c", AssetDecl::script("/c.js").requires("libs"))
            .with("a", AssetDecl::script("/a.js").member_of("libs"))
            .with("b", AssetDecl::script("/b.js").member_of("libs"));

        let (registry, ready) = build(&manifest);
        assert_eq!(ready.unwrap(), vec!["a", "b"]);

        let group = registry.group("libs").unwrap();
        assert_eq!(group.members(), &["a".to_string(), "b".to_string()]);
        assert_eq!(group.notify_on_load(), &["c".to_string()]);
    }

    #[test]
    fn test_asset_shadows_group_of_same_name() {
        let manifest = Manifest::new()
            .with("core", AssetDecl::script("/core.js"))
            .with("x", AssetDecl::script("/x.js").member_of("core"))
            .with("app", AssetDecl::script("/app.js").requires("core"));

        let (registry, _) = build(&manifest);
        assert_eq!(
            registry.get("core").unwrap().notify_on_load(),
            &["app".to_string()]
        );
        assert!(registry.group("core").unwrap().notify_on_load().is_empty());
    }

    #[test]
    fn test_no_entry_point() {
        let manifest = Manifest::new()
            .with("a", AssetDecl::script("/a.js").requires("b"))
            .with("b", AssetDecl::script("/b.js").requires("a"));

        let (_, result) = build(&manifest);
        assert!(matches!(result, Err(LoaderError::NoEntryPoint)));
    }

    #[test]
    fn test_empty_manifest_has_nothing_ready() {
        let (_, ready) = build(&Manifest::new());
        assert!(ready.unwrap().is_empty());
    }

    #[test]
    fn test_required_group_without_members() {
        let manifest = Manifest::new()
            .with("a", AssetDecl::script("/a.js"))
            .with("b", AssetDecl::script("/b.js").requires("plugins"));

        let (_, result) = build(&manifest);
        match result {
            Err(LoaderError::EmptyGroup { group, dependents }) => {
                assert_eq!(group, "plugins");
                assert_eq!(dependents, vec!["b"]);
            }
            other => panic!("expected EmptyGroup, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_group_tolerated_when_configured() {
        let manifest = Manifest::new()
            .with("a", AssetDecl::script("/a.js"))
            .with("b", AssetDecl::script("/b.js").requires("plugins"));

        let mut registry = AssetRegistry::from_manifest(&manifest);
        let config = LoaderConfig::default().with_require_group_members(false);
        let ready = build_graph(&mut registry, &config).unwrap();
        assert_eq!(ready, vec!["a"]);
    }

    #[test]
    fn test_unrequired_group_without_dependents_is_fine() {
        let manifest = Manifest::new().with("a", AssetDecl::script("/a.js").member_of("unused"));
        let (_, result) = build(&manifest);
        assert!(result.is_ok());
    }

    #[test]
    fn test_cycle_behind_entry_point() {
        let manifest = Manifest::new()
            .with("root", AssetDecl::script("/root.js"))
            .with("a", AssetDecl::script("/a.js").requires("root").requires("b"))
            .with("b", AssetDecl::script("/b.js").requires("a"));

        let (_, result) = build(&manifest);
        match result {
            Err(LoaderError::Cycle { assets }) => assert_eq!(assets, vec!["a", "b"]),
            other => panic!("expected Cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_through_group() {
        let manifest = Manifest::new()
            .with("root", AssetDecl::script("/root.js"))
            .with("a", AssetDecl::script("/a.js").member_of("g").requires("g"));

        let (_, result) = build(&manifest);
        assert!(matches!(result, Err(LoaderError::Cycle { .. })));
    }

    #[test]
    fn test_cycle_detection_can_be_disabled() {
        let manifest = Manifest::new()
            .with("root", AssetDecl::script("/root.js"))
            .with("a", AssetDecl::script("/a.js").requires("b"))
            .with("b", AssetDecl::script("/b.js").requires("a"));

        let mut registry = AssetRegistry::from_manifest(&manifest);
        let config = LoaderConfig::default().with_detect_cycles(false);
        assert_eq!(build_graph(&mut registry, &config).unwrap(), vec!["root"]);
    }

    #[test]
    fn test_topological_order() {
        let sorted = topological_order(vec![1, 2, 3], vec![(1, 2), (2, 3)]).unwrap();
        assert_eq!(sorted, vec![1, 2, 3]);

        let blocked = topological_order(vec![1, 2, 3], vec![(2, 3), (3, 2)]).unwrap_err();
        assert_eq!(blocked, vec![2, 3]);
    }
}
