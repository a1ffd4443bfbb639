//! Best-effort resolution of raw dependency targets to scanned files

use crate::models::{CodeFile, DependencyEdge};
use std::collections::{HashMap, HashSet};

/// Turn every file's raw targets into file-to-file edges.
///
/// A target resolves to the first file, in scan order, whose relative path
/// contains it or whose name without extension equals it. A file never
/// resolves to itself. Targets that match nothing (usually third-party
/// packages) produce no edge. Several targets of one file resolving to the
/// same file collapse into a single edge with a higher weight.
pub fn resolve_dependencies(files: &[CodeFile]) -> Vec<DependencyEdge> {
    let mut by_stem: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, file) in files.iter().enumerate() {
        by_stem.entry(file.file_stem()).or_default().push(idx);
    }

    let mut edges: Vec<DependencyEdge> = Vec::new();
    let mut edge_index: HashMap<(usize, usize), usize> = HashMap::new();

    for (source_idx, source) in files.iter().enumerate() {
        for target in &source.dependencies {
            let Some(target_idx) = find_candidate(files, &by_stem, source_idx, target) else {
                continue;
            };
            match edge_index.get(&(source_idx, target_idx)) {
                Some(&existing) => edges[existing].weight += 1,
                None => {
                    edge_index.insert((source_idx, target_idx), edges.len());
                    edges.push(DependencyEdge::import(
                        source.id.clone(),
                        files[target_idx].id.clone(),
                    ));
                }
            }
        }
    }

    let pairs: HashSet<(&str, &str)> = edges
        .iter()
        .map(|edge| (edge.source.as_str(), edge.target.as_str()))
        .collect();
    let circular: Vec<bool> = edges
        .iter()
        .map(|edge| pairs.contains(&(edge.target.as_str(), edge.source.as_str())))
        .collect();
    for (edge, is_circular) in edges.iter_mut().zip(circular) {
        edge.circular = is_circular;
    }

    edges
}

fn find_candidate(
    files: &[CodeFile],
    by_stem: &HashMap<&str, Vec<usize>>,
    source_idx: usize,
    target: &str,
) -> Option<usize> {
    let stem_hit = by_stem
        .get(target)
        .and_then(|indices| indices.iter().copied().find(|&idx| idx != source_idx));

    // Only files before the stem hit can still win on a path substring.
    let limit = stem_hit.unwrap_or(files.len());
    files[..limit]
        .iter()
        .enumerate()
        .find(|(idx, file)| *idx != source_idx && file.relative_path.contains(target))
        .map(|(idx, _)| idx)
        .or(stem_hit)
}
