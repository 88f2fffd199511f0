/// Selects the eigenpair that is targeted at rank `num` (zero-indexed, as is the return value)
/// from the unsorted spectrum of a general dense eigendecomposition.
///
/// Eigenvalues are ranked by squared magnitude `re^2 + im^2`, largest first. The scan does not
/// sort: it finds the current maximum, then `num` more times finds the largest magnitude strictly
/// below the previous one. Ties resolve to the earliest index, and a magnitude shared by several
/// eigenvalues only occupies a single rank.
/// If fewer than `num+1` distinct magnitudes exist, the last one found is returned.
///
/// Returns None only for an empty spectrum.
pub fn find_eig(num: usize, dr: &[f64], di: &[f64]) -> Option<usize>{
    debug_assert_eq!(dr.len(), di.len(), "find_eig: real and imaginary parts must have the same length");
    let a2: Vec<f64> = dr.iter().zip(di.iter())
        .map(|(&re, &im)| re*re + im*im)
        .collect();

    let mut maxj = -1.0;
    let mut w = None;
    for (i, &ai) in a2.iter().enumerate(){
        if ai > maxj {
            maxj = ai;
            w = Some(i);
        }
    }
    for _ in 0..num {
        let mut nmax = -1.0;
        for (i, &ai) in a2.iter().enumerate(){
            if ai > nmax && ai < maxj {
                nmax = ai;
                w = Some(i);
            }
        }
        maxj = nmax;
    }

    w
}
