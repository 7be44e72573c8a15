//! 填空扫描器
//!
//! 按固定顺序遍历模板：分区 → 字段 → 子字段 → 同一文本内从左到右的标记，
//! 为每个标记截取前后上下文。扫描是模板的纯函数，对未修改的模板重复扫描
//! 得到完全相同的结果和顺序，题号只来源于这个顺序。

use crate::config::Config;
use crate::models::question::{BlankLocation, MarkerOccurrence};
use crate::models::template::Template;

/// 扫描与上下文渲染设置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    /// 填空标记
    pub marker: String,
    /// 上下文中替代标记的占位符
    pub placeholder: String,
    /// 截断时使用的省略符
    pub ellipsis: String,
    /// 前后各保留的字符数
    pub window: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ScanSettings {
    fn from(config: &Config) -> Self {
        Self {
            marker: config.marker_token.clone(),
            placeholder: config.blank_placeholder.clone(),
            ellipsis: config.ellipsis.clone(),
            window: config.context_window,
        }
    }
}

/// 填空扫描器
#[derive(Debug, Clone, Default)]
pub struct BlankScanner {
    settings: ScanSettings,
}

impl BlankScanner {
    pub fn new(settings: ScanSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    /// 按扫描顺序惰性产出所有标记
    ///
    /// 每次调用都从头开始，迭代器有限
    pub fn occurrences<'t>(
        &'t self,
        template: &'t Template,
    ) -> impl Iterator<Item = MarkerOccurrence> + 't {
        template
            .sections
            .iter()
            .enumerate()
            .flat_map(move |(section, s)| {
                s.fields.iter().enumerate().flat_map(move |(field, f)| {
                    let label = f.label();
                    f.scan_targets()
                        .into_iter()
                        .flat_map(move |(sub_field, text)| {
                            self.scan_text(text, section, field, sub_field, label)
                        })
                })
            })
    }

    /// 扫描整个模板
    pub fn scan(&self, template: &Template) -> Vec<MarkerOccurrence> {
        self.occurrences(template).collect()
    }

    /// 统计模板中的标记数量（不截取上下文）
    pub fn count(&self, template: &Template) -> usize {
        template
            .sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .flat_map(|f| f.scan_targets())
            .map(|(_, text)| self.count_in(text))
            .sum()
    }

    /// 统计单个文本中的标记数量
    pub fn count_in(&self, text: &str) -> usize {
        text.matches(self.settings.marker.as_str()).count()
    }

    /// 扫描单个文本
    ///
    /// 第 k 个标记的前文是按标记切分后的第 k 段，后文是第 k+1 段，
    /// 因此相邻标记各自的上下文互不重叠
    fn scan_text(
        &self,
        text: &str,
        section: usize,
        field: usize,
        sub_field: Option<usize>,
        label: Option<&str>,
    ) -> Vec<MarkerOccurrence> {
        let segments: Vec<&str> = text.split(self.settings.marker.as_str()).collect();

        segments
            .windows(2)
            .enumerate()
            .map(|(occurrence, pair)| {
                let (before, before_truncated) = self.tail(pair[0]);
                let (after, after_truncated) = self.head(pair[1]);
                MarkerOccurrence {
                    location: BlankLocation {
                        section,
                        field,
                        sub_field,
                        occurrence,
                    },
                    label: label.map(str::to_string),
                    before,
                    after,
                    before_truncated,
                    after_truncated,
                }
            })
            .collect()
    }

    /// 保留最后 `window` 个字符，截断时加省略符前缀
    fn tail(&self, segment: &str) -> (String, bool) {
        let len = segment.chars().count();
        if len <= self.settings.window {
            return (segment.to_string(), false);
        }
        let kept: String = segment.chars().skip(len - self.settings.window).collect();
        (format!("{}{}", self.settings.ellipsis, kept), true)
    }

    /// 保留前 `window` 个字符，截断时加省略符后缀
    fn head(&self, segment: &str) -> (String, bool) {
        if segment.chars().count() <= self.settings.window {
            return (segment.to_string(), false);
        }
        let kept: String = segment.chars().take(self.settings.window).collect();
        (format!("{}{}", kept, self.settings.ellipsis), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::{Field, Section};

    fn scanner_with_window(window: usize) -> BlankScanner {
        BlankScanner::new(ScanSettings {
            marker: "<b>".to_string(),
            placeholder: "__".to_string(),
            ellipsis: "…".to_string(),
            window,
        })
    }

    fn one_field(field: Field) -> Template {
        Template {
            title: "T".to_string(),
            sections: vec![Section::new("S", vec![field])],
        }
    }

    #[test]
    fn test_no_marker_contributes_nothing() {
        let scanner = scanner_with_window(10);
        assert!(scanner.scan(&one_field(Field::leaf("plain text"))).is_empty());
    }

    #[test]
    fn test_two_markers_have_disjoint_windows() {
        let scanner = scanner_with_window(10);
        let occ = scanner.scan(&one_field(Field::leaf("x <b> and <b> y")));
        assert_eq!(occ.len(), 2);
        assert_eq!((occ[0].before.as_str(), occ[0].after.as_str()), ("x ", " and "));
        assert_eq!((occ[1].before.as_str(), occ[1].after.as_str()), (" and ", " y"));
        assert_eq!(occ[0].location.occurrence, 0);
        assert_eq!(occ[1].location.occurrence, 1);
    }

    #[test]
    fn test_adjacent_markers_share_empty_boundary() {
        let scanner = scanner_with_window(10);
        let occ = scanner.scan(&one_field(Field::leaf("<b><b>")));
        assert_eq!(occ.len(), 2);
        assert!(occ.iter().all(|o| o.before.is_empty() && o.after.is_empty()));
        assert!(occ.iter().all(|o| !o.before_truncated && !o.after_truncated));
    }

    #[test]
    fn test_truncation_uses_char_window() {
        let scanner = scanner_with_window(3);
        let occ = scanner.scan(&one_field(Field::leaf("一二三四五<b>六七八九")));
        assert_eq!(occ[0].before, "…三四五");
        assert_eq!(occ[0].after, "六七八…");
        assert!(occ[0].before_truncated && occ[0].after_truncated);
        assert_eq!(occ[0].context("__"), "…三四五__六七八…");
    }

    #[test]
    fn test_exact_window_is_not_truncated() {
        let scanner = scanner_with_window(3);
        let occ = scanner.scan(&one_field(Field::leaf("abc<b>def")));
        assert_eq!(occ[0].before, "abc");
        assert_eq!(occ[0].after, "def");
    }

    #[test]
    fn test_group_prefix_is_label_not_scanned() {
        let scanner = scanner_with_window(10);
        let field = Field::group("Contact <b>:", vec!["phone".into(), "mail <b>".into()]);
        let occ = scanner.scan(&one_field(field));
        assert_eq!(occ.len(), 1);
        assert_eq!(occ[0].location.sub_field, Some(1));
        assert_eq!(occ[0].label.as_deref(), Some("Contact <b>:"));
        assert_eq!(occ[0].before, "mail ");
    }

    #[test]
    fn test_scan_order_and_determinism() {
        let scanner = scanner_with_window(10);
        let template = Template {
            title: "T".into(),
            sections: vec![
                Section::new("A", vec![Field::leaf("<b>"), Field::group("", vec!["<b>".into(), "<b><b>".into()])]),
                Section::new("B", vec![Field::leaf("z<b>")]),
            ],
        };
        let first = scanner.scan(&template);
        let second: Vec<_> = scanner.occurrences(&template).collect();
        assert_eq!(first, second);
        assert_eq!(scanner.count(&template), 5);

        let order: Vec<_> = first
            .iter()
            .map(|o| (o.location.section, o.location.field, o.location.sub_field, o.location.occurrence))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, 0, None, 0),
                (0, 1, Some(0), 0),
                (0, 1, Some(1), 0),
                (0, 1, Some(1), 1),
                (1, 0, None, 0),
            ]
        );
    }
}
