#![cfg(test)]

use crate::compositor::Compositor;
use crate::lm::{LanguageModel, TextLanguageModel};
use crate::settings::CompositorSettings;
use crate::unigram::Unigram;

/// Pinyin readings for 高科技公司的年終獎金 and neighbours.
pub const SAMPLE_LM: &str = "\
ni3 你 -6.0
zhe4 這 -6.0
yang4 樣 -6.0
si1 絲 -9.495858
si1 思 -9.006414
si1 私 -99.0
si1 斯 -8.091803
si1 司 -99.0
si1 嘶 -13.513987
si1 撕 -12.259095
gao1 高 -7.171551
ke1 顆 -10.574273
ke1 棵 -11.504072
ke1 刻 -10.450457
ke1 科 -7.171052
ke1 柯 -99.0
gao1 膏 -11.928720
gao1 篙 -13.624335
gao1 糕 -12.390804
de5 的 -3.516024
di2 的 -3.516024
di4 的 -3.516024
zhong1 中 -5.809297
de5 得 -7.427179
gong1 共 -8.381971
gong1 供 -8.501463
ji4 既 -99.0
jin1 今 -8.034095
gong1 紅 -8.858181
ji4 際 -7.608341
ji4 季 -99.0
jin1 金 -7.290109
ji4 騎 -10.939895
zhong1 終 -99.0
ji4 記 -99.0
ji4 寄 -99.0
jin1 斤 -99.0
ji4 繼 -9.715317
ji4 計 -7.926683
ji4 暨 -8.373022
zhong1 鐘 -9.877580
jin1 禁 -10.711079
gong1 公 -7.877973
gong1 工 -7.822167
gong1 攻 -99.0
gong1 功 -99.0
gong1 宮 -99.0
zhong1 鍾 -9.685671
ji4 繫 -10.425662
gong1 弓 -99.0
gong1 恭 -99.0
ji4 劑 -8.888722
ji4 祭 -10.204425
jin1 浸 -11.378321
zhong1 盅 -99.0
ji4 忌 -99.0
ji4 技 -8.450826
jin1 筋 -11.074890
gong1 躬 -99.0
ji4 冀 -12.045357
zhong1 忠 -99.0
ji4 妓 -99.0
ji4 濟 -9.517568
ji4 薊 -12.021587
jin1 巾 -99.0
jin1 襟 -12.784206
nian2 年 -6.086515
jiang3 講 -9.164384
jiang3 獎 -8.690941
jiang3 蔣 -10.127828
nian2 黏 -11.336864
nian2 粘 -11.285740
jiang3 槳 -12.492933
gong1-si1 公司 -6.299461
ke1-ji4 科技 -6.736613
ji4-gong1 濟公 -13.336653
jiang3-jin1 獎金 -10.344678
nian2-zhong1 年終 -11.668947
nian2-zhong1 年中 -11.373044
gao1-ke1-ji4 高科技 -9.842421
zhe4-yang4 這樣 -6.0
ni3-zhe4 你這 -9.0
ke1-ke1 顆顆 -13.0
";

/// A model where a two-key reading also maps to an emoji.
pub const EMOJI_LM: &str = "\
gao1 高 -2.9396
re4 熱 -3.6024
gao1-re4 高熱 -6.526
huo3 火 -3.6966
huo3 🔥 -8.0
yan4 焰 -5.4466
huo3-yan4 火焰 -5.6231
huo3-yan4 🔥 -8.0
wei2 危 -3.9832
xian3 險 -3.7810
wei2-xian3 危險 -4.2623
";

/// A two-key word whose characters do not match its readings.
pub const LITCH_LM: &str = "\
nai3 乃 -9.0
ji1 雞 -8.0
nai3-ji1 荔枝 -1.0
";

pub const SAMPLE_READINGS: [&str; 10] = [
    "gao1", "ke1", "ji4", "gong1", "si1", "de5", "nian2", "zhong1", "jiang3", "jin1",
];

pub fn sample_lm() -> TextLanguageModel {
    TextLanguageModel::parse(SAMPLE_LM).unwrap()
}

pub fn test_settings() -> CompositorSettings {
    CompositorSettings::default()
}

/// A compositor with `keys` typed in order.
pub fn compose<M: LanguageModel>(lm: M, keys: &[&str]) -> Compositor<M> {
    let mut c = Compositor::with_settings(lm, test_settings());
    for key in keys {
        c.insert_key(key).unwrap();
    }
    c
}

pub fn walked_values<M: LanguageModel>(c: &mut Compositor<M>) -> Vec<String> {
    c.walk().values().into_iter().map(str::to_string).collect()
}

/// Deterministic synthetic model over any keys: single keys always resolve,
/// longer slices (up to three keys) resolve for roughly two thirds of inputs.
/// Scores are spread over `-10.0..0.0`.
#[derive(Debug, Clone, Default)]
pub struct HashLm;

impl HashLm {
    fn fnv(key_array: &[String]) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for key in key_array {
            for b in key.bytes().chain(std::iter::once(0)) {
                h ^= u64::from(b);
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        }
        h
    }
}

impl LanguageModel for HashLm {
    fn unigrams_for(&self, key_array: &[String]) -> Vec<Unigram> {
        let h = Self::fnv(key_array);
        if key_array.is_empty() || key_array.len() > 3 || (key_array.len() > 1 && h % 3 == 0) {
            return Vec::new();
        }
        let joined = key_array.concat();
        (0..1 + (h % 3))
            .map(|i| {
                let score = -(((h >> (8 * i)) % 1000) as f64) / 100.0;
                Unigram::new(format!("{joined}#{i}"), score)
            })
            .collect()
    }
}

/// A model whose existence check disagrees with its lookup.
#[derive(Debug, Clone, Default)]
pub struct LyingLm;

impl LanguageModel for LyingLm {
    fn unigrams_for(&self, _key_array: &[String]) -> Vec<Unigram> {
        Vec::new()
    }

    fn has_unigrams_for(&self, _key_array: &[String]) -> bool {
        true
    }
}
