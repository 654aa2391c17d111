/// Size ranking: orders a category's files largest-first.
///
/// An in-place quicksort driven by an explicit work stack instead of
/// recursion. The larger partition is always deferred and the smaller one
/// processed next, so the stack never holds more than ~log2(n) ranges,
/// whatever the input order.
use crate::model::FileEntry;

/// Ranges at or below this length are finished with insertion sort.
const INSERTION_THRESHOLD: usize = 16;

/// Sort `files` by size, descending. Not stable.
pub fn rank_by_size(mut files: Vec<FileEntry>) -> Vec<FileEntry> {
    rank_in_place(&mut files);
    files
}

/// In-place variant of [`rank_by_size`].
pub fn rank_in_place(files: &mut [FileEntry]) {
    let mut stack: Vec<(usize, usize)> = Vec::with_capacity(64);
    // Half-open ranges [lo, hi).
    let mut lo = 0;
    let mut hi = files.len();

    loop {
        while hi - lo > INSERTION_THRESHOLD {
            let (lt, gt) = partition(files, lo, hi);
            // [lo, lt) is larger than the pivot, [lt, gt) equals it,
            // [gt, hi) is smaller. Only the outer two need more work.
            if lt - lo < hi - gt {
                stack.push((gt, hi));
                hi = lt;
            } else {
                stack.push((lo, lt));
                lo = gt;
            }
        }
        insertion_sort(&mut files[lo..hi]);

        match stack.pop() {
            Some((l, h)) => {
                lo = l;
                hi = h;
            }
            None => break,
        }
    }
}

/// Three-way (Dutch flag) partition around a median-of-three pivot.
///
/// Grouping equal sizes keeps duplicate-heavy inputs (many zero-byte
/// files, say) linear instead of quadratic.
fn partition(files: &mut [FileEntry], lo: usize, hi: usize) -> (usize, usize) {
    let pivot = median_of_three(
        files[lo].size,
        files[lo + (hi - lo) / 2].size,
        files[hi - 1].size,
    );

    let mut lt = lo;
    let mut i = lo;
    let mut gt = hi;
    while i < gt {
        let size = files[i].size;
        if size > pivot {
            files.swap(lt, i);
            lt += 1;
            i += 1;
        } else if size < pivot {
            gt -= 1;
            files.swap(i, gt);
        } else {
            i += 1;
        }
    }
    (lt, gt)
}

fn median_of_three(a: u64, b: u64, c: u64) -> u64 {
    if (a >= b) == (b >= c) {
        b
    } else if (b >= a) == (a >= c) {
        a
    } else {
        c
    }
}

fn insertion_sort(files: &mut [FileEntry]) {
    for i in 1..files.len() {
        let mut j = i;
        while j > 0 && files[j - 1].size < files[j].size {
            files.swap(j - 1, j);
            j -= 1;
        }
    }
}
