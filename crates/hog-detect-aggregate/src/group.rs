//! Merging and clustering of surviving rectangles.

use hog_detect_core::{DisjointSet, Rect};

/// Replace intersecting rectangles by their bounding box until no pair
/// intersects.
///
/// Each pass sweeps the list in order, growing the current box with every
/// later rectangle it touches. Passes repeat until one absorbs nothing, so
/// `merge(merge(r)) == merge(r)`.
pub fn merge(rects: &[Rect]) -> Vec<Rect> {
    let mut current = rects.to_vec();
    loop {
        let mut absorbed = vec![false; current.len()];
        let mut next = Vec::with_capacity(current.len());
        let mut changed = false;

        for i in 0..current.len() {
            if absorbed[i] {
                continue;
            }
            let mut acc = current[i];
            for j in i + 1..current.len() {
                if !absorbed[j] && acc.intersects(&current[j]) {
                    acc = acc.bounding_union(&current[j]);
                    absorbed[j] = true;
                    changed = true;
                }
            }
            next.push(acc);
        }

        current = next;
        if !changed {
            return current;
        }
    }
}

/// Whether `a` and `b` describe roughly the same object.
///
/// Position deltas are compared against `eps * max(a.width, a.height)`, size
/// deltas against `eps * max(b.width, b.height)`.
pub fn are_similar(a: &Rect, b: &Rect, eps: f64) -> bool {
    let dx = (a.x as f64 - b.x as f64).abs();
    let dy = (a.y as f64 - b.y as f64).abs();
    let dw = (a.width as f64 - b.width as f64).abs();
    let dh = (a.height as f64 - b.height as f64).abs();
    let side_a = a.width.max(a.height) as f64;
    let side_b = b.width.max(b.height) as f64;

    dx <= eps * side_a && dy <= eps * side_a && dw <= eps * side_b && dh <= eps * side_b
}

/// Cluster labels for `rects`: two rectangles share a cluster when a chain of
/// intersecting, [`are_similar`] pairs links them.
///
/// Labels are dense and numbered by first appearance. Returns the labels and
/// the cluster count.
pub fn partition(rects: &[Rect], eps: f64) -> (Vec<usize>, usize) {
    let mut sets = DisjointSet::new(rects.len());
    for (i, a) in rects.iter().enumerate() {
        for (j, b) in rects.iter().enumerate().skip(i + 1) {
            if a.intersects(b) && are_similar(a, b, eps) {
                sets.union(i, j);
            }
        }
    }
    sets.component_labels()
}

/// Cluster with [`partition`], drop clusters of at most `group_threshold`
/// members and replace each survivor by its average rectangle.
///
/// Averages are truncated toward zero. Output follows the first appearance of
/// each cluster in `rects`.
pub fn group_rectangles(rects: &[Rect], group_threshold: usize, eps: f64) -> Vec<Rect> {
    let (labels, count) = partition(rects, eps);

    let mut sums = vec![[0i64; 4]; count];
    let mut sizes = vec![0usize; count];
    for (r, &label) in rects.iter().zip(&labels) {
        let s = &mut sums[label];
        s[0] += r.x as i64;
        s[1] += r.y as i64;
        s[2] += r.width as i64;
        s[3] += r.height as i64;
        sizes[label] += 1;
    }

    let grouped: Vec<Rect> = sums
        .iter()
        .zip(&sizes)
        .filter(|(_, &n)| n > group_threshold)
        .map(|(s, &n)| {
            let n = n as i64;
            Rect::new(
                (s[0] / n) as i32,
                (s[1] / n) as i32,
                (s[2] / n) as i32,
                (s[3] / n) as i32,
            )
        })
        .collect();

    log::trace!(
        "grouped {} rects into {} clusters, {} kept",
        rects.len(),
        count,
        grouped.len()
    );
    grouped
}
