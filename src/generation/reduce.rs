//! Farthest-point site reduction

use super::sites::Site;

/// Cap the site list at `max_sites`, spreading the survivors out
///
/// Site 0 and every protected site are kept. The rest are picked greedily:
/// each round adds the site whose nearest selected site is farthest away.
/// The result starts with site 0, followed by the other survivors in their
/// original order, truncated to `max_sites`. Fewer sites come back only
/// when the input is already small enough.
pub fn reduce_sites(sites: &[Site], max_sites: usize) -> Vec<Site> {
    let count = sites.len();
    if count <= max_sites {
        return sites.to_vec();
    }

    let mut keep: Vec<bool> = sites.iter().map(|s| s.protected).collect();
    keep[0] = true;

    let mut selected: Vec<usize> = (0..count).filter(|&i| keep[i]).collect();

    // Squared distance from every site to its nearest selected site,
    // updated incrementally as sites are added
    let mut nearest_sq: Vec<f32> = sites
        .iter()
        .map(|s| {
            selected
                .iter()
                .map(|&j| s.position.distance_squared(sites[j].position))
                .fold(f32::MAX, f32::min)
        })
        .collect();

    while selected.len() < max_sites {
        let mut best: Option<(usize, f32)> = None;
        for i in (0..count).filter(|&i| !keep[i]) {
            if best.map_or(true, |(_, d)| nearest_sq[i] > d) {
                best = Some((i, nearest_sq[i]));
            }
        }

        let Some((best_idx, _)) = best else {
            break;
        };

        keep[best_idx] = true;
        selected.push(best_idx);
        let added = sites[best_idx].position;
        for (i, site) in sites.iter().enumerate() {
            nearest_sq[i] = nearest_sq[i].min(site.position.distance_squared(added));
        }
    }

    std::iter::once(sites[0])
        .chain((1..count).filter(|&i| keep[i]).map(|i| sites[i]))
        .take(max_sites)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn line_sites(n: usize) -> Vec<Site> {
        (0..n).map(|i| Site::new(Vec2::new(i as f32, 0.0))).collect()
    }

    #[test]
    fn test_small_input_unchanged() {
        let sites = line_sites(5);
        assert_eq!(reduce_sites(&sites, 5), sites);
        assert_eq!(reduce_sites(&sites, 10), sites);
    }

    #[test]
    fn test_reduces_to_cap() {
        let sites = line_sites(30);
        let reduced = reduce_sites(&sites, 10);
        assert_eq!(reduced.len(), 10);
        assert_eq!(reduced[0], sites[0]);
    }

    #[test]
    fn test_farthest_point_order() {
        // From x=0 the farthest is x=10, then the midpoint x=5
        let sites = line_sites(11);
        let reduced = reduce_sites(&sites, 3);
        let xs: Vec<f32> = reduced.iter().map(|s| s.position.x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn test_protected_sites_survive() {
        let mut sites = line_sites(20);
        sites[1].protected = true;
        sites[2].protected = true;
        let reduced = reduce_sites(&sites, 4);

        assert_eq!(reduced.len(), 4);
        assert!(reduced.contains(&sites[0]));
        assert!(reduced.contains(&sites[1]));
        assert!(reduced.contains(&sites[2]));
        // Last slot goes to the far end of the line
        assert!(reduced.contains(&sites[19]));
    }

    #[test]
    fn test_original_order_kept() {
        let sites = line_sites(40);
        let reduced = reduce_sites(&sites, 8);
        for pair in reduced.windows(2) {
            assert!(pair[0].position.x < pair[1].position.x);
        }
    }

    #[test]
    fn test_too_many_protected_truncates() {
        let mut sites = line_sites(10);
        for s in sites.iter_mut() {
            s.protected = true;
        }
        let reduced = reduce_sites(&sites, 3);
        assert_eq!(reduced, sites[..3].to_vec());
    }
}
