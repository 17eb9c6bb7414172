//! ロケール別の日時フォーマット
//!
//! - fa-IR: 太陽ヒジュラ暦（ジャラーリー暦）＋ペルシア数字
//!   例: "۱۴۰۵/۷/۲۷، ۱۴:۳۰:۱۲"
//! - en-US: 例: "10/19/2026, 2:30:12 PM"

use chrono::{Datelike, NaiveDateTime, Timelike};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    FaIr,
    EnUs,
}

impl Locale {
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::FaIr => "fa-IR",
            Locale::EnUs => "en-US",
        }
    }

    /// 右から左に書く言語か
    pub fn is_rtl(&self) -> bool {
        matches!(self, Locale::FaIr)
    }
}

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];

/// 各月1日までの累積日数（グレゴリオ暦・平年）
const GREGORIAN_DAYS_BEFORE_MONTH: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// グレゴリオ暦 → ジャラーリー暦 (年, 月, 日)
pub fn gregorian_to_jalali(gy: i64, gm: u32, gd: u32) -> (i64, u32, u32) {
    let gy2 = if gm > 2 { gy + 1 } else { gy };
    let mut days = 355_666
        + 365 * gy
        + (gy2 + 3) / 4
        - (gy2 + 99) / 100
        + (gy2 + 399) / 400
        + gd as i64
        + GREGORIAN_DAYS_BEFORE_MONTH[(gm as usize).clamp(1, 12) - 1];

    // 33年周期
    let mut jy = -1595 + 33 * (days / 12_053);
    days %= 12_053;
    jy += 4 * (days / 1461);
    days %= 1461;
    if days > 365 {
        jy += (days - 1) / 365;
        days = (days - 1) % 365;
    }

    let (jm, jd) = if days < 186 {
        (1 + days / 31, 1 + days % 31)
    } else {
        (7 + (days - 186) / 30, 1 + (days - 186) % 30)
    };

    (jy, jm as u32, jd as u32)
}

/// ASCII数字をペルシア数字に置換
pub fn to_persian_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => PERSIAN_DIGITS[d as usize],
            None => c,
        })
        .collect()
}

/// 日時をロケールに従って整形
pub fn format_timestamp(dt: &NaiveDateTime, locale: Locale) -> String {
    match locale {
        Locale::FaIr => {
            let (jy, jm, jd) = gregorian_to_jalali(dt.year() as i64, dt.month(), dt.day());
            let text = format!(
                "{}/{}/{}، {:02}:{:02}:{:02}",
                jy,
                jm,
                jd,
                dt.hour(),
                dt.minute(),
                dt.second()
            );
            to_persian_digits(&text)
        }
        Locale::EnUs => dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
    }
}

/// 現在時刻（ローカル）を整形
pub fn now_formatted(locale: Locale) -> String {
    format_timestamp(&chrono::Local::now().naive_local(), locale)
}
