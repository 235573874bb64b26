// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Advisor (dosen) profile with the list of advised students.

use serde::{Deserialize, Serialize};

/// `GET /dosen` response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosenResponse {
    #[serde(default)]
    pub response: bool,
    #[serde(default)]
    pub message: String,
    pub data: Dosen,
}

/// The signed-in advisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dosen {
    pub nama: String,
    pub nip: String,
    pub email: String,
    pub info_mahasiswa_pa: InfoMahasiswaPa,
}

impl Dosen {
    /// Students this advisor is responsible for.
    pub fn students(&self) -> &[Mahasiswa] {
        &self.info_mahasiswa_pa.daftar_mahasiswa
    }

    /// Look up an advised student by NIM.
    pub fn find_student(&self, nim: &str) -> Option<&Mahasiswa> {
        self.students().iter().find(|m| m.nim == nim)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoMahasiswaPa {
    #[serde(default)]
    pub daftar_mahasiswa: Vec<Mahasiswa>,
}

/// A student as listed on the advisor dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mahasiswa {
    /// Student number, unique
    pub nim: String,
    pub nama: String,
    pub angkatan: String,
    pub info_setoran: ProgresSetoran,
}

/// Overall progress percentage for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgresSetoran {
    /// 0..=100
    pub persentase_progres_setor: f64,
}

impl ProgresSetoran {
    /// Progress as a 0..=1 ratio, clamped.
    pub fn ratio(&self) -> f64 {
        percent_to_ratio(self.persentase_progres_setor)
    }
}

pub(crate) fn percent_to_ratio(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    (percent / 100.0).clamp(0.0, 1.0)
}
