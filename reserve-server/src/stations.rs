//! Station catalogue for the search form.
//!
//! Station names are what both carriers accept as search input. The lists
//! are fixed; carriers rarely open stations and a new one needs a release
//! anyway for the frontend to offer it.

use std::collections::BTreeMap;

use crate::domain::TrainType;

const SRT_STATIONS: &[&str] = &[
    "수서", "동탄", "평택지제", "경주", "곡성", "공주", "광주송정", "구례구", "김천(구미)",
    "나주", "남원", "대전", "동대구", "마산", "목포", "밀양", "부산", "서대구", "순천",
    "여수EXPO", "여천", "오송", "울산(통도사)", "익산", "전주", "정읍", "진영", "진주",
    "창원", "창원중앙", "천안아산", "포항",
];

const KTX_STATIONS: &[&str] = &[
    "서울", "용산", "영등포", "광명", "수원", "천안아산", "오송", "대전", "서대전",
    "김천구미", "동대구", "경주", "포항", "밀양", "구포", "부산", "울산(통도사)", "마산",
    "창원중앙", "경산", "논산", "익산", "정읍", "광주송정", "목포", "전주", "순천",
    "여수EXPO", "청량리", "강릉", "행신",
];

/// Station names per carrier, each list sorted ascending.
#[derive(Debug, Clone)]
pub struct StationCatalogue {
    by_type: BTreeMap<TrainType, Vec<String>>,
}

impl StationCatalogue {
    pub fn new() -> Self {
        let by_type = TrainType::ALL
            .into_iter()
            .map(|t| {
                let names = match t {
                    TrainType::Srt => SRT_STATIONS,
                    TrainType::Ktx => KTX_STATIONS,
                };
                (t, sorted(names))
            })
            .collect();
        Self { by_type }
    }

    pub fn stations(&self, train_type: TrainType) -> &[String] {
        self.by_type.get(&train_type).map(Vec::as_slice).unwrap_or_default()
    }

    /// `{"SRT": [...], "KTX": [...]}`
    pub fn to_json(&self) -> serde_json::Value {
        self.by_type
            .iter()
            .map(|(t, names)| (t.as_str().to_string(), serde_json::json!(names)))
            .collect::<serde_json::Map<_, _>>()
            .into()
    }
}

impl Default for StationCatalogue {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted(names: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
    names.sort();
    names.dedup();
    names
}
