use std::cmp::Ordering;

use log::debug;
use rayon::prelude::*;

use super::alphabet::Alphabet;
use crate::error::{InvalidInput, Result};

/// 超过该长度时排序改用 rayon 并行排序
const PAR_SORT_MIN: usize = 1 << 16;

/// `rotations_matrix` 输出 O(n^2) 字节，仅用于小输入展示
pub const MATRIX_LIMIT: usize = 256;

/// 循环旋转：以起始偏移表示，按模 n 读取原缓冲区，不物化旋转串。
#[derive(Debug, Clone, Copy)]
pub struct Rotation<'a> {
    text: &'a [u8],
    start: usize,
}

impl<'a> Rotation<'a> {
    /// 最后一个字符，即该旋转贡献给 BWT 的字符
    #[inline]
    pub fn last(&self) -> u8 {
        let n = self.text.len();
        self.text[(self.start + n - 1) % n]
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + 'a {
        let text: &'a [u8] = self.text;
        let (head, tail) = text.split_at(self.start);
        tail.iter().chain(head.iter()).copied()
    }
}

impl PartialEq for Rotation<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Rotation<'_> {}

impl PartialOrd for Rotation<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rotation<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

/// 旋转索引：借用已编码、以哨兵（编码 0）结尾的文本。
/// 哨兵唯一且最小，因此任意两个旋转互不相同，排序是全序。
#[derive(Debug, Clone, Copy)]
pub struct RotationIndex<'a> {
    text: &'a [u8],
}

impl<'a> RotationIndex<'a> {
    pub fn new(text: &'a [u8]) -> Self {
        Self { text }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn rotation(&self, offset: usize) -> Rotation<'a> {
        debug_assert!(offset < self.text.len());
        Rotation { text: self.text, start: offset }
    }

    pub fn compare(&self, a: usize, b: usize) -> Ordering {
        self.rotation(a).cmp(&self.rotation(b))
    }

    /// 循环倍增排序：第 k 轮后 rank 反映长度 2k 的循环前缀的次序。
    /// 至多 O(log n) 轮，每轮一次比较排序。
    pub fn sorted_offsets(&self) -> Vec<u32> {
        let text = self.text;
        let n = text.len();
        if n == 0 {
            return Vec::new();
        }
        if n == 1 {
            return vec![0];
        }
        let mut sa: Vec<usize> = (0..n).collect();
        let mut rank: Vec<u32> = text.iter().map(|&b| b as u32).collect();
        let mut tmp: Vec<u32> = vec![0; n];

        let mut k = 1usize;
        let mut rounds = 0usize;
        loop {
            {
                let rank = &rank;
                let key = |i: usize| (rank[i], rank[(i + k) % n]);
                if n >= PAR_SORT_MIN {
                    sa.par_sort_unstable_by_key(|&i| key(i));
                } else {
                    sa.sort_unstable_by_key(|&i| key(i));
                }

                tmp[sa[0]] = 0;
                for i in 1..n {
                    let (a, b) = (sa[i - 1], sa[i]);
                    tmp[b] = tmp[a] + u32::from(key(a) != key(b));
                }
            }
            rank.copy_from_slice(&tmp);
            rounds += 1;

            if rank[sa[n - 1]] as usize == n - 1 || k >= n {
                break;
            }
            k <<= 1;
        }
        debug!("sorted {} rotations in {} doubling rounds", n, rounds);

        sa.into_iter().map(|x| x as u32).collect()
    }

    /// 直接比较旋转的排序，最坏 O(n^2 log n)，用于展示和校验。
    pub fn naive_sorted_offsets(&self) -> Vec<u32> {
        let mut offsets: Vec<usize> = (0..self.text.len()).collect();
        offsets.sort_by(|&a, &b| self.compare(a, b));
        offsets.into_iter().map(|x| x as u32).collect()
    }
}

/// 排好序的旋转矩阵（每行一个旋转，已解码为字节，含哨兵）。
pub fn rotations_matrix(sequence: &[u8], alphabet: &Alphabet) -> Result<Vec<Vec<u8>>> {
    if sequence.len() > MATRIX_LIMIT {
        return Err(InvalidInput::TooLong { len: sequence.len(), limit: MATRIX_LIMIT }.into());
    }
    let text = alphabet.encode_terminated(sequence)?;
    let idx = RotationIndex::new(&text);
    let rows = idx
        .naive_sorted_offsets()
        .into_iter()
        .map(|off| {
            let codes: Vec<u8> = idx.rotation(off as usize).iter().collect();
            alphabet.decode(&codes)
        })
        .collect();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_text(len: usize, sigma: u32) -> Vec<u8> {
        let mut x: u32 = 1_234_567;
        let mut v = Vec::with_capacity(len + 1);
        for _ in 0..len {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            v.push(((x >> 16) % sigma) as u8 + 1);
        }
        v.push(0);
        v
    }

    #[test]
    fn rotation_reads_cyclically() {
        // A C G $ -> 1 2 3 0
        let text = [1u8, 2, 3, 0];
        let idx = RotationIndex::new(&text);
        let r = idx.rotation(2);
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![3, 0, 1, 2]);
        assert_eq!(r.last(), 2);
        assert_eq!(idx.rotation(0).last(), 0);
    }

    #[test]
    fn sorted_basic() {
        // A C G T $ -> 旋转按字典序：$ACGT, ACGT$, CGT$A, GT$AC, T$ACG
        let text = [1u8, 2, 3, 4, 0];
        let idx = RotationIndex::new(&text);
        assert_eq!(idx.sorted_offsets(), vec![4, 0, 1, 2, 3]);
    }

    #[test]
    fn doubling_matches_naive_on_small_random_texts() {
        for len in 1..=40 {
            for sigma in [1u32, 2, 4] {
                let text = make_text(len, sigma);
                let idx = RotationIndex::new(&text);
                assert_eq!(
                    idx.sorted_offsets(),
                    idx.naive_sorted_offsets(),
                    "mismatch on len={} sigma={}",
                    len,
                    sigma
                );
            }
        }
    }

    #[test]
    fn single_symbol_runs_are_totally_ordered() {
        // A A A A $：哨兵保证没有相同的旋转
        let text = [1u8, 1, 1, 1, 0];
        let idx = RotationIndex::new(&text);
        assert_eq!(idx.sorted_offsets(), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn matrix_of_acg() {
        let rows = rotations_matrix(b"ACG", &Alphabet::dna()).unwrap();
        let rows: Vec<&[u8]> = rows.iter().map(Vec::as_slice).collect();
        assert_eq!(rows, vec![&b"$ACG"[..], b"ACG$", b"CG$A", b"G$AC"]);
    }

    #[test]
    fn matrix_refuses_long_input() {
        let seq = vec![b'A'; MATRIX_LIMIT + 1];
        assert!(rotations_matrix(&seq, &Alphabet::dna()).is_err());
    }
}
