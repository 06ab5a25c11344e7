//! The two question banks. Both are compiled in; `QuizKind` picks one at the
//! start of a conversation.

use super::{Catalog, Question, QuestionOption};

const fn opt(key: &'static str, text: &'static str) -> QuestionOption {
    QuestionOption { key, text }
}

pub static INSURANCE: Catalog = Catalog {
    id: "insurance",
    title: "推薦保單系統",
    questions: &[
        Question {
            id: "Q1",
            text: "Q1. 這份保險主要是要幫誰規劃？",
            options: &[
                opt("A", "我自己"),
                opt("B", "配偶 / 伴侶"),
                opt("C", "小孩"),
                opt("D", "父母 / 長輩"),
                opt("E", "公司員工（一群人）"),
            ],
            multi: false,
        },
        Question {
            id: "Q2",
            text: "Q2. 被保險人的年齡大約是？",
            options: &[
                opt("A", "0–20"),
                opt("B", "21–30"),
                opt("C", "31–45"),
                opt("D", "46–60"),
                opt("E", "61 以上"),
            ],
            multi: false,
        },
        Question {
            id: "Q3",
            text: "Q3. 目前的身分？",
            options: &[
                opt("A", "學生"),
                opt("B", "上班族"),
                opt("C", "自營 / 兼職 / 高風險工作"),
                opt("D", "家庭主婦 / 夫"),
                opt("E", "退休"),
            ],
            multi: false,
        },
        Question {
            id: "Q4",
            text: "Q4. 家庭狀況？",
            options: &[
                opt("A", "單身"),
                opt("B", "已婚，沒有小孩"),
                opt("C", "已婚，有小孩"),
                opt("D", "需要照顧長輩"),
            ],
            multi: false,
        },
        Question {
            id: "Q5",
            text: "Q5. 你現在最擔心哪些事情？（可複選）",
            options: &[
                opt("A", "生病住院、手術費太高"),
                opt("B", "得到癌症或重大疾病"),
                opt("C", "將來失能或需要人長期照顧"),
                opt("D", "若我意外或身故，家人生活怎麼辦"),
                opt("E", "常騎車/開車，擔心意外骨折、車禍"),
                opt("F", "為退休/子女教育準備一筆錢（穩穩存、穩穩領）"),
                opt("G", "想要有投資報酬，可接受有漲有跌"),
                opt("H", "希望定期健檢、線上健康管理"),
                opt("I", "我是老闆/管理者，想幫員工規劃保障"),
            ],
            multi: true,
        },
        Question {
            id: "Q6",
            text: "Q6. 你最在意保障的「時間長度」？",
            options: &[
                opt("A", "短期 1–3 年，先解決眼前需求"),
                opt("B", "10–20 年，中長期規劃"),
                opt("C", "希望保障到老，甚至終身"),
            ],
            multi: false,
        },
        Question {
            id: "Q7",
            text: "Q7. 對投資風險的接受度？",
            options: &[
                opt("A", "很保守，只想穩定存錢"),
                opt("B", "可接受有漲有跌，但不要太刺激"),
                opt("C", "可接受較大波動，長期有機會成長"),
            ],
            multi: false,
        },
        Question {
            id: "Q8",
            text: "Q8. 你比較希望透過什麼方式投保？",
            options: &[
                opt("A", "用手機/電腦自己線上完成"),
                opt("B", "去銀行辦理（定存/基金時順便問）"),
                opt("C", "透過業務或行銷人員面談"),
            ],
            multi: false,
        },
        Question {
            id: "Q9",
            text: "Q9. 未來 1 年內，你是否有如下計畫？（可複選）",
            options: &[
                opt("A", "海外旅遊、出差"),
                opt("B", "國內環島、登山、潛水等活動"),
                opt("C", "公司打算幫員工規劃團體保險"),
            ],
            multi: true,
        },
    ],
};

pub static VALUES: Catalog = Catalog {
    id: "values",
    title: "價值觀分析系統",
    questions: &[
        Question {
            id: "V1",
            text: "Q1. 你的年齡區間？",
            options: &[
                opt("A", "18 以下"),
                opt("B", "19–25"),
                opt("C", "26–35"),
                opt("D", "36–45"),
                opt("E", "46 以上"),
            ],
            multi: false,
        },
        Question {
            id: "V2",
            text: "Q2. 你的性別？",
            options: &[opt("A", "男"), opt("B", "女"), opt("C", "不便透露")],
            multi: false,
        },
        Question {
            id: "V3",
            text: "Q3. 你的職業類型？",
            options: &[
                opt("A", "學生"),
                opt("B", "上班族"),
                opt("C", "自營/自由業"),
                opt("D", "家庭照顧者"),
                opt("E", "退休/其他"),
            ],
            multi: false,
        },
        Question {
            id: "V4",
            text: "Q4. 面對風險你比較偏向？",
            options: &[
                opt("A", "能避就避，穩定最重要"),
                opt("B", "可以承擔一些風險換取更好結果"),
                opt("C", "願意承擔較大風險追求成長"),
            ],
            multi: false,
        },
        Question {
            id: "V5",
            text: "Q5. 你更重視？",
            options: &[
                opt("A", "當下生活品質"),
                opt("B", "長期累積與未來保障"),
                opt("C", "兩者都要平衡"),
            ],
            multi: false,
        },
        Question {
            id: "V6",
            text: "Q6. 你對「家庭責任」的感受？",
            options: &[
                opt("A", "我需要扛起主要責任"),
                opt("B", "有責任但可分擔"),
                opt("C", "目前責任較少/不明顯"),
            ],
            multi: false,
        },
        Question {
            id: "V7",
            text: "Q7. 你更在意保障的是？",
            options: &[
                opt("A", "醫療/住院/手術"),
                opt("B", "重大傷病/癌症"),
                opt("C", "意外/失能"),
                opt("D", "退休/年金/財務規劃"),
            ],
            multi: false,
        },
        Question {
            id: "V8",
            text: "Q8. 你做決策通常？",
            options: &[
                opt("A", "很快決定，先做再說"),
                opt("B", "會做功課比較後再決定"),
                opt("C", "需要別人建議/一起討論"),
            ],
            multi: false,
        },
        Question {
            id: "V9",
            text: "Q9. 你對保險的期待更像？",
            options: &[
                opt("A", "最基本先有，不求複雜"),
                opt("B", "想要完整配置，避免風險缺口"),
                opt("C", "想要有彈性/可調整"),
            ],
            multi: false,
        },
        Question {
            id: "V10",
            text: "Q10. 你對保費支出的態度？",
            options: &[
                opt("A", "越低越好，能省則省"),
                opt("B", "合理就好，重點是保障到位"),
                opt("C", "願意付更多換更安心/更好的服務"),
            ],
            multi: false,
        },
        Question {
            id: "V11",
            text: "Q11. 你對「長期照顧」的擔心程度？",
            options: &[
                opt("A", "不太擔心"),
                opt("B", "有點擔心"),
                opt("C", "非常擔心/家族有案例"),
            ],
            multi: false,
        },
        Question {
            id: "V12",
            text: "Q12. 最終動機：你希望透過保險解決什麼？（可選也可輸入）",
            options: &[
                opt("A", "讓家人更安心"),
                opt("B", "降低突發醫療支出風險"),
                opt("C", "長期財務規劃/退休"),
                opt("D", "把風險轉嫁，生活更穩"),
            ],
            multi: false,
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn question_ids_are_unique_per_catalog() {
        for catalog in [&INSURANCE, &VALUES] {
            let ids: HashSet<_> = catalog.questions.iter().map(|q| q.id).collect();
            assert_eq!(ids.len(), catalog.len(), "{}", catalog.id);
        }
    }

    #[test]
    fn only_insurance_has_multi_select_questions() {
        let multi: Vec<_> = INSURANCE
            .questions
            .iter()
            .filter(|q| q.multi)
            .map(|q| q.id)
            .collect();
        assert_eq!(multi, vec!["Q5", "Q9"]);
        assert!(VALUES.questions.iter().all(|q| !q.multi));
        assert_eq!(INSURANCE.len(), 9);
        assert_eq!(VALUES.len(), 12);
    }
}
