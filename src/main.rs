//main.rs
use clap::Parser;
use clusters_lib::DataSet;

#[derive(Parser)]
#[clap(version = "0.1.0", about = "Single-linkage agglomerative clustering")]
struct Opts {
    /// Point data: one tab-separated row of attributes per point
    #[clap(short, long)]
    file: String,

    /// Target number of clusters
    #[clap(short, long)]
    k: usize,

    /// Optional file to write one cluster label per point to
    #[clap(short, long)]
    outfile: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let ds = DataSet::from_tsv(&opts.file)?;
    println!("Number of data points: {}", ds.nrows());
    println!("Number of attributes: {}", ds.ncols());

    let clustering = ds.single_linkage(opts.k)?;

    println!("Cluster sizes:");
    for (i, size) in clustering.sizes.iter().enumerate() {
        println!("  Cluster {}: {}", i + 1, size);
    }

    if let Some(outfile) = &opts.outfile {
        std::fs::write(
            outfile,
            clustering
                .labels
                .iter()
                .map(|label| label.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        )?;
    }

    Ok(())
}
