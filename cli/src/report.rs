use eigenspace::{linalg::Matrix, Report};

fn matrix(out: &mut String, title: &str, m: &Matrix) {
    out.push_str(&format!("\n{} ({} x {}):\n", title, m.height(), m.width()));
    for row in m.rows() {
        let cells: Vec<String> = row.iter().map(|a| format!("{:>10.6}", a)).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
}

fn vector(out: &mut String, title: &str, v: &[f64]) {
    let cells: Vec<String> = v.iter().map(|a| format!("{:.6}", a)).collect();
    out.push_str(&format!("\n{}:\n{}\n", title, cells.join(" ")));
}

/// Render each recorded stage in pipeline order.
pub fn render(report: &Report, query: &[f64]) -> String {
    let mut out = String::new();
    if let Some(cov) = &report.covariance {
        matrix(&mut out, "Covariance matrix", cov.matrix());
    }
    if let Some(eigen) = &report.eigen {
        matrix(&mut out, "Eigenvectors", eigen.vectors());
        vector(&mut out, "Eigenvalues", eigen.values());
        if let Some((position, value)) = eigen.dominant() {
            out.push_str(&format!(
                "\nLargest eigenvalue: {:.6}; in column {}\n",
                value, position
            ));
        }
        vector(&mut out, "Explained variance", &eigen.explained_variance());
    }
    if let Some(means) = &report.means {
        vector(&mut out, "Means for each training data row", means);
    }
    vector(&mut out, "New data", query);
    if let Some(centered) = &report.centered {
        matrix(&mut out, "Mean subtracted data with new data at start", centered.matrix());
    }
    if let Some(projected) = &report.projected {
        matrix(&mut out, "Transformed all data", projected.matrix());
    }
    if let Some(distances) = &report.distances {
        if let Ok(row) = distances.row(0) {
            vector(&mut out, "Euclidean distances for new data", row);
        }
    }
    out.push('\n');
    out
}
