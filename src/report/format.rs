//! Terminal formatting for analyses.

use crate::domain::{Analysis, VotingResult};
use crate::io::RunMeta;
use crate::oracle::KMeansModel;
use crate::report::{CurveRow, curve_rows};

/// Header + curve table + votes.
pub fn format_analysis(analysis: &Analysis, meta: &RunMeta) -> String {
    let mut out = String::new();

    out.push_str("=== kfind - best k by elbow voting ===\n");
    out.push_str(&format!("Points: n={} | dim={}\n", meta.n_points, meta.dim));
    out.push_str(&format!(
        "Range: k=[{}, {}] | seed={} | normalization={:?}\n",
        meta.finder.kmin, meta.finder.kmax, meta.finder.seed, meta.finder.normalization
    ));
    if let Some(blobs) = &meta.blobs {
        out.push_str(&format!(
            "Blobs: centers={} x {} points | std={} | seed={}\n",
            blobs.centers, blobs.points_per_center, blobs.std, blobs.seed
        ));
    }
    if let Some(kmeans) = &meta.kmeans {
        out.push_str(&format!(
            "Oracle: k-means n_init={} max_iter={} scale={:?}\n",
            kmeans.n_init, kmeans.max_iter, kmeans.scale
        ));
    }

    out.push_str("\nDistortion curve:\n");
    out.push_str(&format_curve_table(&curve_rows(analysis)));

    out.push_str("\nVotes:\n");
    out.push_str(&format_votes(&analysis.result));

    out
}

pub fn format_curve_table(rows: &[CurveRow]) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!("{:>4} {:>16} {:>10} {:>10}", "k", "distortion", "pd %", "2nd delta"),
    );
    push_line(&mut out, format!("{:-<4} {:-<16} {:-<10} {:-<10}", "", "", "", ""));

    for r in rows {
        push_line(
            &mut out,
            format!(
                "{:>4} {:>16.4} {:>10} {:>10}",
                r.k,
                r.distortion,
                fmt_opt(r.percent_delta),
                fmt_opt(r.second_delta)
            ),
        );
    }

    out
}

pub fn format_votes(result: &VotingResult) -> String {
    let mut out = String::new();

    for vote in &result.votes {
        let marker = if vote.k == result.final_k { "*" } else { " " };
        let note = if vote.fallback { "  (flat curve, midpoint)" } else { "" };
        push_line(
            &mut out,
            format!(
                "{marker} {}. {:<22} k={}{note}",
                vote.method.number(),
                vote.method.display_name(),
                vote.k
            ),
        );
    }

    out.push_str(&format!(
        "\nBest k: {} ({}/5 methods agree)\n",
        result.final_k,
        result.support()
    ));
    if let Some(tie) = &result.tie_break {
        out.push_str(&format!(
            "Tie between k={} with {} votes each; took the largest.\n",
            fmt_ks(&tie.tied),
            tie.count
        ));
    }

    out
}

/// Cluster sizes of the refit model at the chosen k.
pub fn format_clusters(model: &KMeansModel) -> String {
    let sizes = model.cluster_sizes();
    format!(
        "Clusters at k={}: inertia={:.4} | iterations={} | sizes={}\n",
        model.k,
        model.inertia,
        model.iterations,
        fmt_ks(&sizes)
    )
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| format!("{x:.2}")).unwrap_or_else(|| "-".to_string())
}

fn fmt_ks(ks: &[usize]) -> String {
    let parts: Vec<String> = ks.iter().map(|k| k.to_string()).collect();
    format!("[{}]", parts.join(", "))
}
