// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-student submission (setoran) detail and mutation payloads.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::dosen::percent_to_ratio;

/// `GET /mahasiswa/{nim}/setoran` response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetoranMahasiswaResponse {
    #[serde(default)]
    pub response: bool,
    #[serde(default)]
    pub message: String,
    pub data: SetoranMahasiswa,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetoranMahasiswa {
    pub info: InfoMahasiswa,
    pub setoran: Setoran,
}

/// Student profile shown above the submission list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoMahasiswa {
    pub nama: String,
    pub nim: String,
    #[serde(default)]
    pub email: String,
    pub angkatan: String,
    #[serde(default)]
    pub semester: u32,
    pub dosen_pa: DosenRingkas,
}

/// Minimal advisor reference embedded in other records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosenRingkas {
    pub nama: String,
    #[serde(default)]
    pub nip: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setoran {
    pub info_dasar: InfoDasar,
    #[serde(default)]
    pub ringkasan: Vec<Ringkasan>,
    #[serde(default)]
    pub detail: Vec<DetailSetoran>,
}

/// Overall progress summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoDasar {
    pub total_wajib_setor: u32,
    pub total_sudah_setor: u32,
    pub total_belum_setor: u32,
    pub persentase_progres_setor: f64,
    #[serde(default)]
    pub tgl_terakhir_setor: Option<String>,
    /// Human-readable "last submitted" text, e.g. "3 hari yang lalu"
    #[serde(default)]
    pub terakhir_setor: String,
}

impl InfoDasar {
    pub fn ratio(&self) -> f64 {
        percent_to_ratio(self.persentase_progres_setor)
    }
}

/// Progress for one category of components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ringkasan {
    pub label: String,
    pub total_wajib_setor: u32,
    pub total_sudah_setor: u32,
    #[serde(default)]
    pub total_belum_setor: u32,
    pub persentase_progres_setor: f64,
}

/// One gradable component and whether it has been submitted.
///
/// `info_setoran` is present iff `sudah_setor` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailSetoran {
    /// Component id (idKomponenSetoran)
    pub id: String,
    pub nama: String,
    pub label: String,
    pub sudah_setor: bool,
    #[serde(default)]
    pub info_setoran: Option<InfoSetoran>,
}

impl DetailSetoran {
    pub fn is_consistent(&self) -> bool {
        self.sudah_setor == self.info_setoran.is_some()
    }
}

/// Validation record of a completed submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoSetoran {
    /// Submission id, used for deletion
    pub id: String,
    pub tgl_setoran: String,
    pub tgl_validasi: String,
    pub dosen_yang_mengesahkan: DosenRingkas,
}

impl SetoranMahasiswa {
    /// Components the student still owes; candidates for a new submission.
    pub fn pending_components(&self) -> impl Iterator<Item = &DetailSetoran> {
        self.setoran.detail.iter().filter(|d| !d.sudah_setor)
    }

    /// Completed submissions, shaped as delete request items.
    pub fn deletable_submissions(&self) -> Vec<SetoranItem> {
        self.setoran
            .detail
            .iter()
            .filter(|d| d.sudah_setor)
            .filter_map(|d| {
                d.info_setoran.as_ref().map(|info| SetoranItem {
                    id: Some(info.id.clone()),
                    id_komponen_setoran: d.id.clone(),
                    nama_komponen_setoran: d.nama.clone(),
                })
            })
            .collect()
    }

    /// Items breaking the `sudah_setor` / `info_setoran` pairing.
    pub fn inconsistent_items(&self) -> Vec<&DetailSetoran> {
        self.setoran
            .detail
            .iter()
            .filter(|d| !d.is_consistent())
            .collect()
    }
}

/// Body of the add and delete endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetoranRequest {
    #[validate(length(min = 1))]
    #[validate(nested)]
    pub data_setoran: Vec<SetoranItem>,
}

impl SetoranRequest {
    pub fn single(item: SetoranItem) -> Self {
        Self {
            data_setoran: vec![item],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SetoranItem {
    /// Submission id; only set when deleting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "submission id must not be empty"))]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "component id must not be empty"))]
    pub id_komponen_setoran: String,
    #[validate(length(min = 1, message = "component name must not be empty"))]
    pub nama_komponen_setoran: String,
}

impl SetoranItem {
    /// Item for adding a submission of the given component.
    pub fn add(id_komponen: impl Into<String>, nama_komponen: impl Into<String>) -> Self {
        Self {
            id: None,
            id_komponen_setoran: id_komponen.into(),
            nama_komponen_setoran: nama_komponen.into(),
        }
    }

    /// Item for deleting submission `id` of the given component.
    pub fn delete(
        id: impl Into<String>,
        id_komponen: impl Into<String>,
        nama_komponen: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            id_komponen_setoran: id_komponen.into(),
            nama_komponen_setoran: nama_komponen.into(),
        }
    }
}

/// Acknowledgement returned by the add and delete endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub response: bool,
    #[serde(default)]
    pub message: String,
}
