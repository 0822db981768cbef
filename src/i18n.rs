// =============================================================================
// Localised report labels
// =============================================================================
//
// Static lookup tables only: one `Labels` per supported `Language`.  Nothing
// here formats numbers or dates differently per locale.

use crate::types::Language;

/// Every user-facing label the report carries.
#[derive(Debug)]
pub struct Labels {
    pub title: &'static str,
    pub enter_ticker: &'static str,
    pub financial_summary: &'static str,
    pub news_title: &'static str,
    pub news_no_summary: &'static str,
    pub no_news: &'static str,
    pub table_title: &'static str,
    pub current_price: &'static str,
    pub price_unavailable: &'static str,

    // Summary table columns.
    pub date: &'static str,
    pub open: &'static str,
    pub high: &'static str,
    pub low: &'static str,
    pub close: &'static str,
    pub volume: &'static str,
    pub price_change: &'static str,
    pub price_change_pct: &'static str,
    pub rsi: &'static str,

    // Fundamentals.
    pub per: &'static str,
    pub eps: &'static str,
    pub pb: &'static str,
    pub op_margin: &'static str,
    pub total_revenue: &'static str,
    pub total_assets: &'static str,
}

static KOREAN: Labels = Labels {
    title: "📊 실시간 주식 분석",
    enter_ticker: "티커 또는 기업명을 입력해주세요.",
    financial_summary: "📊 재무 지표",
    news_title: "📰 실시간 뉴스",
    news_no_summary: "(요약 없음)",
    no_news: "최근 뉴스가 없습니다.",
    table_title: "📋 최근 10일 시장 데이터",
    current_price: "💰 실시간 현재가",
    price_unavailable: "실시간 가격 정보를 불러올 수 없습니다.",
    date: "날짜",
    open: "시가",
    high: "고가",
    low: "저가",
    close: "종가",
    volume: "거래량",
    price_change: "변동폭",
    price_change_pct: "변동률(%)",
    rsi: "RSI",
    per: "PER",
    eps: "EPS",
    pb: "PBR",
    op_margin: "영업이익률",
    total_revenue: "총매출",
    total_assets: "총자산",
};

static ENGLISH: Labels = Labels {
    title: "📊 Stock Analysis",
    enter_ticker: "Please enter a ticker or company name.",
    financial_summary: "📊 Financial Summary",
    news_title: "📰 Real-Time News",
    news_no_summary: "(No summary)",
    no_news: "No recent news found.",
    table_title: "📋 Latest 10 Days Market Data",
    current_price: "💰 Current Price",
    price_unavailable: "Real-time price is unavailable.",
    date: "Date",
    open: "Open",
    high: "High",
    low: "Low",
    close: "Close",
    volume: "Volume",
    price_change: "Price Change",
    price_change_pct: "Change (%)",
    rsi: "RSI",
    per: "PER",
    eps: "EPS",
    pb: "PBR",
    op_margin: "Operating Margin",
    total_revenue: "Total Revenue",
    total_assets: "Total Assets",
};

static SIMPLIFIED_CHINESE: Labels = Labels {
    title: "📊 实时股票分析",
    enter_ticker: "请输入股票代码或公司名称。",
    financial_summary: "📊 财务摘要",
    news_title: "📰 实时新闻",
    news_no_summary: "(无摘要)",
    no_news: "暂无最新新闻。",
    table_title: "📋 最近10天市场数据",
    current_price: "💰 实时价格",
    price_unavailable: "无法获取实时价格。",
    date: "日期",
    open: "开盘价",
    high: "最高价",
    low: "最低价",
    close: "收盘价",
    volume: "成交量",
    price_change: "价格变化",
    price_change_pct: "变化率(%)",
    rsi: "RSI",
    per: "市盈率",
    eps: "每股收益",
    pb: "市净率",
    op_margin: "营业利润率",
    total_revenue: "总收入",
    total_assets: "总资产",
};

static JAPANESE: Labels = Labels {
    title: "📊 リアルタイム株式分析",
    enter_ticker: "ティッカーまたは会社名を入力してください。",
    financial_summary: "📊 財務概要",
    news_title: "📰 リアルタイムニュース",
    news_no_summary: "(要約なし)",
    no_news: "最近のニュースはありません。",
    table_title: "📋 最新10日間の市場データ",
    current_price: "💰 リアルタイム価格",
    price_unavailable: "リアルタイム価格を取得できません。",
    date: "日付",
    open: "始値",
    high: "高値",
    low: "安値",
    close: "終値",
    volume: "出来高",
    price_change: "変動幅",
    price_change_pct: "変動率(%)",
    rsi: "RSI",
    per: "PER",
    eps: "EPS",
    pb: "PBR",
    op_margin: "営業利益率",
    total_revenue: "総収益",
    total_assets: "総資産",
};

/// Label table for `lang`.
pub fn labels(lang: Language) -> &'static Labels {
    match lang {
        Language::Korean => &KOREAN,
        Language::English => &ENGLISH,
        Language::SimplifiedChinese => &SIMPLIFIED_CHINESE,
        Language::Japanese => &JAPANESE,
    }
}
