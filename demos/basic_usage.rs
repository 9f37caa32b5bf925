//! 演示在 library 模式下使用 bwt-rust：正向变换、逆变换、检索与压缩分析。
//!
//! 运行方式：
//! ```bash
//! cargo run --example basic_usage
//! ```

use bwt_rust::analysis::{self, compression};
use bwt_rust::index::rotation::rotations_matrix;
use bwt_rust::index::{build, invert, search, Alphabet, RankTables};
use bwt_rust::util::dna;

fn main() -> anyhow::Result<()> {
    // 1. 旋转矩阵
    println!("ACG 的排序旋转:");
    for row in rotations_matrix(b"ACG", &Alphabet::dna())? {
        println!("  {}", String::from_utf8_lossy(&row));
    }

    // 2. 正向变换与逆变换
    for seq in [&b"ACAGTGAT"[..], b"GATTACA", b"BANANA", b"ATCGATCGATCG"] {
        let alphabet = Alphabet::infer(seq, b'$')?;
        let result = build(seq, &alphabet)?;
        let restored = invert(&result)?;
        println!(
            "\n原序列: {}\nBWT:    {}\n还原:   {} ({})",
            String::from_utf8_lossy(seq),
            String::from_utf8_lossy(&result.bwt),
            String::from_utf8_lossy(&restored),
            if restored == seq { "一致" } else { "不一致" }
        );
    }

    // 3. 反向搜索
    println!();
    let cases: [(&[u8], &[u8]); 3] = [
        (b"TCGACGAT", b"CGA"),
        (b"ATCGATCGATCGAATCGATCG", b"ATCG"),
        (b"GATTACAGATTACA", b"GATT"),
    ];
    for (text, pattern) in cases {
        let result = build(text, &Alphabet::dna())?;
        let tables = RankTables::build(&result.bwt, &result.alphabet)?;
        let m = search(&result, &tables, pattern)?;
        println!(
            "'{}' 在 '{}' 中出现 {} 次，位置 {:?}",
            String::from_utf8_lossy(pattern),
            String::from_utf8_lossy(text),
            m.count,
            m.sorted_offsets()
        );
    }

    // 4. 与朴素扫描的计时对比
    let text = dna::repetitive_dna(1_050, b"ATCGATCGATCGAATCGATCG");
    let cmp = analysis::compare_search(&text, b"ATCG", &Alphabet::dna())?;
    println!(
        "\n文本 {} bp：BWT 计数 {}，朴素计数 {}，搜索 {:?} vs 扫描 {:?}",
        cmp.text_len, cmp.bwt_count, cmp.naive_count, cmp.bwt_time, cmp.naive_time
    );

    // 5. 压缩特征
    println!();
    for (name, seq) in [
        ("重复 DNA", b"AAATTTCCCGGGA".repeat(10)),
        ("周期序列", b"ACGT".repeat(8)),
        ("文本", b"to be or not to be that is the question".to_vec()),
    ] {
        let alphabet = Alphabet::infer(&seq, b'$')?;
        let result = build(&seq, &alphabet)?;
        let stats = compression::analyze(&seq, &result);
        println!(
            "{}: 游程 {} -> {}，比值 {:.3}，熵变化 {:.3}",
            name, stats.original_runs, stats.bwt_runs, stats.run_reduction_ratio, stats.entropy_reduction
        );
    }

    Ok(())
}
