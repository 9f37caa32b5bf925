use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand};
use log::{debug, info, warn, LevelFilter};

use bwt_rust::analysis::{self, compression};
use bwt_rust::index::alphabet::{Alphabet, DNA_SYMBOLS};
use bwt_rust::index::fm::{FmIndex, IndexMeta};
use bwt_rust::index::rank::DEFAULT_OCC_INTERVAL;
use bwt_rust::index::{self, rotation, MatchSet};
use bwt_rust::io::fasta;
use bwt_rust::util::{dna, logging};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "bwt-rust", author, version, about = "Burrows-Wheeler Transform toolkit: transform, invert, search, analyze", arg_required_else_help = true)]
struct Cli {
    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Worker threads for batch search (0 = all cores)
    #[arg(short = 't', long = "threads", global = true, default_value_t = 0)]
    threads: usize,
    #[command(subcommand)]
    command: Commands,
}

/// 变换相关的公共参数
#[derive(Args, Debug, Clone)]
struct BuildArgs {
    /// Sentinel symbol appended to the sequence (must not occur in it)
    #[arg(long, default_value_t = '$')]
    sentinel: char,
    /// Restrict the alphabet to A/C/G/T (input is upper-cased, U read as T)
    #[arg(long)]
    dna: bool,
    /// Occ checkpoint interval of the rank tables
    #[arg(long = "occ-interval", default_value_t = DEFAULT_OCC_INTERVAL)]
    occ_interval: usize,
}

impl BuildArgs {
    fn sentinel_byte(&self) -> Result<u8> {
        u8::try_from(self.sentinel)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| anyhow!("sentinel '{}' is not an ASCII character", self.sentinel))
    }

    fn prepare(&self, raw: &[u8]) -> Vec<u8> {
        if self.dna {
            dna::normalize_seq(raw)
        } else {
            raw.to_vec()
        }
    }

    /// DNA 模式用固定字母表，否则以 `symbols_from` 中出现的字符为字母表
    fn alphabet(&self, symbols_from: &[u8]) -> Result<Alphabet> {
        let sentinel = self.sentinel_byte()?;
        let alphabet = if self.dna {
            Alphabet::new(DNA_SYMBOLS, sentinel)?
        } else {
            let symbols: Vec<u8> = symbols_from.iter().copied().filter(|&b| b != sentinel).collect();
            Alphabet::infer(&symbols, sentinel)?
        };
        Ok(alphabet)
    }
}

/// 序列来源：命令行直接给出，或 FASTA 文件
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["sequence", "fasta"])))]
struct InputArgs {
    /// Sequence given inline
    sequence: Option<String>,
    /// Read sequences from a FASTA file
    #[arg(long)]
    fasta: Option<String>,
}

impl InputArgs {
    fn load(&self) -> Result<Vec<(String, Vec<u8>)>> {
        if let Some(seq) = &self.sequence {
            return Ok(vec![("input".to_string(), seq.as_bytes().to_vec())]);
        }
        let path = self.fasta.as_deref().ok_or_else(|| anyhow!("no input sequence given"))?;
        let records = fasta::read_fasta(path)?;
        if records.is_empty() {
            bail!("FASTA file '{}' contains no sequences", path);
        }
        Ok(records.into_iter().map(|r| (r.id, r.seq)).collect())
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a BWT index of the first FASTA record and save it as <output>.bwt
    Index {
        /// Reference FASTA file
        reference: String,
        /// Output prefix for the index file
        #[arg(short, long, default_value = "ref")]
        output: String,
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Print the BWT of each input sequence
    Transform {
        #[command(flatten)]
        input: InputArgs,
        /// Also print the sorted rotation offsets
        #[arg(long)]
        offsets: bool,
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Reconstruct the original sequence from a BWT string
    Invert {
        /// BWT string, containing the sentinel exactly once
        bwt: String,
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Count (and optionally locate) exact pattern occurrences
    #[command(group(ArgGroup::new("target").required(true).args(["index", "fasta", "text"])))]
    Search {
        /// Path to a saved index (.bwt)
        #[arg(short = 'i', long = "index")]
        index: Option<String>,
        /// Search every record of a FASTA file
        #[arg(long)]
        fasta: Option<String>,
        /// Search an inline text
        #[arg(long)]
        text: Option<String>,
        /// Patterns to search for
        #[arg(required = true)]
        patterns: Vec<String>,
        /// Print match start positions
        #[arg(long)]
        locate: bool,
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Compare run counts and entropy before and after the transform
    Analyze {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Print the sorted rotation matrix of a short sequence
    Matrix {
        sequence: String,
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Time backward search against a naive scan
    Bench {
        /// Text to search (defaults to generated random DNA)
        #[arg(long)]
        fasta: Option<String>,
        /// Lengths of generated random DNA, comma separated
        #[arg(long, value_delimiter = ',', default_value = "10000")]
        lengths: Vec<usize>,
        #[arg(long, default_value_t = 42)]
        seed: u32,
        /// Patterns to time
        #[arg(short, long, default_value = "ATCG")]
        pattern: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info });
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("cannot configure thread pool")?;
    }

    match cli.command {
        Commands::Index { reference, output, build } => run_index(&reference, &output, &build),
        Commands::Transform { input, offsets, build } => run_transform(&input, offsets, &build),
        Commands::Invert { bwt, build } => run_invert(&bwt, &build),
        Commands::Search { index, fasta, text, patterns, locate, build } => {
            run_search(index.as_deref(), fasta.as_deref(), text.as_deref(), &patterns, locate, &build)
        }
        Commands::Analyze { input, build } => run_analyze(&input, &build),
        Commands::Matrix { sequence, build } => run_matrix(&sequence, &build),
        Commands::Bench { fasta, lengths, seed, pattern } => run_bench(fasta.as_deref(), &lengths, seed, &pattern),
    }
}

fn run_index(reference: &str, output: &str, build: &BuildArgs) -> Result<()> {
    let records = fasta::read_fasta(reference)?;
    let Some(first) = records.first() else {
        bail!("FASTA file '{}' contains no sequences", reference);
    };
    if records.len() > 1 {
        warn!("'{}' has {} records, indexing only '{}'", reference, records.len(), first.id);
    }
    let seq = build.prepare(&first.seq);
    let alphabet = build.alphabet(&seq)?;

    info!("building index of '{}' ({} symbols)", first.id, seq.len());
    let mut fm = FmIndex::build(&seq, &alphabet, build.occ_interval)
        .with_context(|| format!("cannot index record '{}'", first.id))?;
    fm.set_meta(IndexMeta {
        source_file: Some(reference.to_string()),
        build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
        build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
    });

    let out_path = format!("{}.bwt", output);
    fm.save_to_file(&out_path)
        .map_err(|e| anyhow!("cannot write index to '{}': {}", out_path, e))?;
    println!("index saved: {}", out_path);
    Ok(())
}

fn run_transform(input: &InputArgs, offsets: bool, build: &BuildArgs) -> Result<()> {
    for (id, raw) in input.load()? {
        let seq = build.prepare(&raw);
        let alphabet = build.alphabet(&seq)?;
        let result = index::build(&seq, &alphabet).with_context(|| format!("cannot transform '{}'", id))?;
        println!("{}\t{}", id, String::from_utf8_lossy(&result.bwt));
        if offsets {
            let joined: Vec<String> = result.sorted_offsets.iter().map(u32::to_string).collect();
            println!("{}\t{}", id, joined.join(","));
        }
    }
    Ok(())
}

fn run_invert(bwt: &str, build: &BuildArgs) -> Result<()> {
    let bwt = build.prepare(bwt.as_bytes());
    let alphabet = build.alphabet(&bwt)?;
    let original = index::invert_bwt(&bwt, &alphabet)?;
    println!("{}", String::from_utf8_lossy(&original));
    Ok(())
}

fn print_matches(label: &str, patterns: &[String], results: Vec<bwt_rust::error::Result<MatchSet>>, locate: bool) -> Result<()> {
    for (pattern, res) in patterns.iter().zip(results) {
        let m = res.with_context(|| format!("search for '{}' failed", pattern))?;
        if locate {
            let positions: Vec<String> = m.sorted_offsets().iter().map(u32::to_string).collect();
            println!("{}\t{}\t{}\t{}", label, pattern, m.count, positions.join(","));
        } else {
            println!("{}\t{}\t{}", label, pattern, m.count);
        }
    }
    Ok(())
}

fn run_search(
    index_path: Option<&str>,
    fasta_path: Option<&str>,
    text: Option<&str>,
    patterns: &[String],
    locate: bool,
    build: &BuildArgs,
) -> Result<()> {
    let prepared: Vec<Vec<u8>> = patterns.iter().map(|p| build.prepare(p.as_bytes())).collect();

    if let Some(path) = index_path {
        let fm = FmIndex::load_from_file(path).with_context(|| format!("cannot load index '{}'", path))?;
        let label = fm.meta.source_file.clone().unwrap_or_else(|| path.to_string());
        return print_matches(&label, patterns, fm.search_many(&prepared), locate);
    }

    let targets: Vec<(String, Vec<u8>)> = match (fasta_path, text) {
        (Some(path), _) => fasta::read_fasta(path)?.into_iter().map(|r| (r.id, r.seq)).collect(),
        (None, Some(t)) => vec![("text".to_string(), t.as_bytes().to_vec())],
        (None, None) => bail!("no search target given"),
    };
    for (id, raw) in targets {
        let seq = build.prepare(&raw);
        if seq.is_empty() {
            warn!("skipping empty record '{}'", id);
            continue;
        }
        let alphabet = build.alphabet(&seq)?;
        let fm = FmIndex::build(&seq, &alphabet, build.occ_interval)
            .with_context(|| format!("cannot index record '{}'", id))?;
        debug!("record '{}': {} rows", id, fm.len());
        print_matches(&id, patterns, fm.search_many(&prepared), locate)?;
    }
    Ok(())
}

fn run_analyze(input: &InputArgs, build: &BuildArgs) -> Result<()> {
    for (id, raw) in input.load()? {
        let seq = build.prepare(&raw);
        let alphabet = build.alphabet(&seq)?;
        let result = index::build(&seq, &alphabet).with_context(|| format!("cannot transform '{}'", id))?;
        let stats = compression::analyze(&seq, &result);

        println!("== {}", id);
        println!("length:            {}", stats.original_length);
        println!("bwt length:        {}", stats.bwt_length);
        println!("original runs:     {}", stats.original_runs);
        println!("bwt runs:          {}", stats.bwt_runs);
        println!("run reduction:     {:.3}", stats.run_reduction_ratio);
        println!("original entropy:  {:.3}", stats.original_entropy);
        println!("bwt entropy:       {:.3}", stats.bwt_entropy);
        println!("entropy reduction: {:.3}", stats.entropy_reduction);

        let total = seq.len() as f64;
        for (sym, n) in compression::composition(&seq) {
            println!("  {}: {} ({:.1}%)", sym as char, n, n as f64 * 100.0 / total);
        }
        if let Some(gc) = dna::gc_content(&seq) {
            println!("GC content:        {:.1}%", gc);
        }
    }
    Ok(())
}

fn run_matrix(sequence: &str, build: &BuildArgs) -> Result<()> {
    let seq = build.prepare(sequence.as_bytes());
    let alphabet = build.alphabet(&seq)?;
    for row in rotation::rotations_matrix(&seq, &alphabet)? {
        println!("{}", String::from_utf8_lossy(&row));
    }
    Ok(())
}

fn run_bench(fasta_path: Option<&str>, lengths: &[usize], seed: u32, patterns: &[String]) -> Result<()> {
    let texts: Vec<(String, Vec<u8>)> = match fasta_path {
        Some(path) => fasta::read_fasta(path)?
            .into_iter()
            .map(|r| (r.id, dna::normalize_seq(&r.seq)))
            .filter(|(_, s)| !s.is_empty())
            .collect(),
        None => lengths
            .iter()
            .map(|&len| (format!("random-{}", len), dna::random_dna(len, seed)))
            .collect(),
    };

    println!("text\tlength\tpattern\tbwt_count\tnaive_count\tbuild\tbwt\tnaive\tspeedup");
    for (id, text) in &texts {
        let alphabet = Alphabet::infer(text, b'$')?;
        for pattern in patterns {
            let cmp = analysis::compare_search(text, &dna::normalize_seq(pattern.as_bytes()), &alphabet)?;
            if !cmp.counts_agree() {
                warn!("count mismatch on '{}' for '{}': bwt={} naive={}", id, pattern, cmp.bwt_count, cmp.naive_count);
            }
            let speedup = cmp.speedup().map_or_else(|| "-".to_string(), |s| format!("{:.2}x", s));
            println!(
                "{}\t{}\t{}\t{}\t{}\t{:?}\t{:?}\t{:?}\t{}",
                id, cmp.text_len, pattern, cmp.bwt_count, cmp.naive_count, cmp.build_time, cmp.bwt_time, cmp.naive_time, speedup
            );
        }
    }
    Ok(())
}
