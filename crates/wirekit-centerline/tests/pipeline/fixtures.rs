use wirekit_core::{Bounds3, FacetSet, MeshInput, Point3, Vector3};

/// Rings of outward-facing facets around the X axis
///
/// Each ring holds `per_ring` facets at equal angular steps on a cylinder
/// of the given radius. Rings are spread evenly over `0..=length`.
pub fn ringed_cylinder(radius: f64, length: f64, rings: usize, per_ring: usize) -> FacetSet {
    let pitch = length / (rings - 1) as f64;
    FacetSet::from_pairs((0..rings).flat_map(move |r| {
        let x = r as f64 * pitch;
        (0..per_ring).map(move |k| {
            let theta = k as f64 * std::f64::consts::TAU / per_ring as f64;
            let normal = Vector3::new(0.0, theta.cos(), theta.sin());
            (Point3::new(x, radius * normal.y, radius * normal.z), normal)
        })
    }))
}

/// 50 rings of 4 facets: exactly 200 facets, pitch ≈ one diameter
pub fn cylinder_mesh() -> MeshInput {
    MeshInput::from_facets(ringed_cylinder(1.0, 100.0, 50, 4)).unwrap()
}

/// Open tessellated tube along X, laid out like an STL export
///
/// `bands` rings of `segments` quads, each split into two triangles, in
/// band-major order. Facets carry triangle centroids and normals computed
/// from the vertices; the extent is the vertex bounding-box diagonal.
pub fn triangulated_tube(radius: f64, length: f64, bands: usize, segments: usize) -> MeshInput {
    let vertex = |x: f64, k: usize| {
        let theta = (k % segments) as f64 * std::f64::consts::TAU / segments as f64;
        Point3::new(x, radius * theta.cos(), radius * theta.sin())
    };
    let facet = |a: Point3<f64>, b: Point3<f64>, c: Point3<f64>| {
        let normal = (b - a).cross(&(c - a)).normalize();
        (Point3::from((a.coords + b.coords + c.coords) / 3.0), normal)
    };

    let pitch = length / bands as f64;
    let mut pairs = Vec::with_capacity(2 * bands * segments);
    let mut vertices = Vec::new();
    for band in 0..bands {
        let x0 = band as f64 * pitch;
        let x1 = x0 + pitch;
        for k in 0..segments {
            pairs.push(facet(vertex(x0, k), vertex(x0, k + 1), vertex(x1, k)));
            pairs.push(facet(vertex(x1, k), vertex(x0, k + 1), vertex(x1, k + 1)));
            vertices.push(vertex(x0, k));
            vertices.push(vertex(x1, k));
        }
    }

    let diagonal = Bounds3::from_points(&vertices).unwrap().diagonal();
    MeshInput::new(FacetSet::from_pairs(pairs), diagonal).unwrap()
}
