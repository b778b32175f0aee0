//! Congress.gov tools: bills, congresses, members, and committees. Each
//! method builds a relative endpoint path and forwards it through the
//! shared adapter; the adapter owns auth, format negotiation, and failure
//! containment.

use crate::client::ApiAdapter;
use crate::tools::render;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Identifies a congressional session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CongressKey {
    /// The congressional session number (e.g. 118).
    pub congress: u32,
}

/// Identifies bills of one type within a congress.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BillTypeKey {
    /// The congressional session number.
    pub congress: u32,
    /// The type of bill (e.g. HR, S, HRES).
    pub bill_type: String,
}

/// Identifies a specific bill.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BillKey {
    /// The congressional session number.
    pub congress: u32,
    /// The type of bill (e.g. HR, S, HRES).
    pub bill_type: String,
    /// The bill number.
    pub bill_number: u32,
}

/// Identifies a congressional member.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MemberKey {
    /// The Bioguide ID of the member.
    pub bioguide_id: String,
}

/// Identifies members by state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StateKey {
    /// The two-letter state abbreviation.
    pub state_code: String,
}

/// Identifies members by state and district.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StateDistrictKey {
    /// The two-letter state abbreviation.
    pub state_code: String,
    /// The congressional district number.
    pub district: u32,
}

/// Identifies members by congress, state, and district.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CongressStateDistrictKey {
    /// The congressional session number.
    pub congress: u32,
    /// The two-letter state abbreviation.
    pub state_code: String,
    /// The congressional district number.
    pub district: u32,
}

/// Identifies committees by chamber.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChamberKey {
    /// The chamber of Congress ("house" or "senate").
    pub chamber: String,
}

/// Identifies committees by congress and chamber.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CongressChamberKey {
    /// The congressional session number.
    pub congress: u32,
    /// The chamber of Congress ("house" or "senate").
    pub chamber: String,
}

/// Identifies a specific committee.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CommitteeKey {
    /// The chamber of Congress ("house" or "senate").
    pub chamber: String,
    /// The committee's unique code.
    pub committee_code: String,
}

/// Tool surface for the Congress.gov API, holding the one long-lived
/// adapter shared across all calls.
#[derive(Debug, Clone)]
pub struct CongressTools {
    adapter: Arc<ApiAdapter>,
}

impl CongressTools {
    #[must_use]
    pub const fn new(adapter: Arc<ApiAdapter>) -> Self {
        Self { adapter }
    }

    #[instrument(skip(self))]
    async fn fetch(&self, endpoint: &str, fallback: &str) -> String {
        render(self.adapter.get(endpoint).await, fallback)
    }

    // --- Bills ---

    /// Recent bills.
    pub async fn bills(&self) -> String {
        self.fetch("bill?limit=100", "Unable to fetch bills, or no bills found.")
            .await
    }

    /// Bills filtered by congress number.
    pub async fn bills_by_congress(&self, key: &CongressKey) -> String {
        let endpoint = format!("bill/{}?limit=100", key.congress);
        self.fetch(&endpoint, "Unable to fetch bills, or no bills found.")
            .await
    }

    /// Bills filtered by congress number and bill type.
    pub async fn bills_by_congress_and_type(&self, key: &BillTypeKey) -> String {
        let endpoint = format!(
            "bill/{}/{}?limit=100",
            key.congress,
            key.bill_type.to_lowercase()
        );
        self.fetch(&endpoint, "Unable to fetch bills, or no bills found.")
            .await
    }

    /// Details of a specific bill.
    pub async fn bill_details(&self, key: &BillKey) -> String {
        self.fetch(&Self::bill_endpoint(key, None), "Unable to fetch bill details.")
            .await
    }

    /// Actions taken on a specific bill.
    pub async fn bill_actions(&self, key: &BillKey) -> String {
        self.fetch(
            &Self::bill_endpoint(key, Some("actions")),
            "Unable to fetch bill actions.",
        )
        .await
    }

    /// Amendments to a specific bill.
    pub async fn bill_amendments(&self, key: &BillKey) -> String {
        self.fetch(
            &Self::bill_endpoint(key, Some("amendments")),
            "Unable to fetch bill amendments.",
        )
        .await
    }

    /// Committees associated with a specific bill.
    pub async fn bill_committees(&self, key: &BillKey) -> String {
        self.fetch(
            &Self::bill_endpoint(key, Some("committees")),
            "Unable to fetch committees, or no committees found.",
        )
        .await
    }

    /// Cosponsors of a specific bill.
    pub async fn bill_cosponsors(&self, key: &BillKey) -> String {
        self.fetch(
            &Self::bill_endpoint(key, Some("cosponsors")),
            "Unable to fetch cosponsors, or no cosponsors found.",
        )
        .await
    }

    /// Bills related to a specific bill.
    pub async fn bill_related(&self, key: &BillKey) -> String {
        self.fetch(
            &Self::bill_endpoint(key, Some("relatedbills")),
            "Unable to fetch related bills, or no related bills found.",
        )
        .await
    }

    /// Legislative subjects of a specific bill.
    pub async fn bill_subjects(&self, key: &BillKey) -> String {
        self.fetch(
            &Self::bill_endpoint(key, Some("subjects")),
            "Unable to fetch subjects, or no subjects found.",
        )
        .await
    }

    /// Summaries of a specific bill.
    pub async fn bill_summaries(&self, key: &BillKey) -> String {
        self.fetch(
            &Self::bill_endpoint(key, Some("summaries")),
            "Unable to fetch summaries, or no summaries found.",
        )
        .await
    }

    /// Text versions of a specific bill.
    pub async fn bill_text(&self, key: &BillKey) -> String {
        self.fetch(
            &Self::bill_endpoint(key, Some("text")),
            "Unable to fetch bill text, or no text versions found.",
        )
        .await
    }

    /// Titles of a specific bill.
    pub async fn bill_titles(&self, key: &BillKey) -> String {
        self.fetch(
            &Self::bill_endpoint(key, Some("titles")),
            "Unable to fetch titles, or no titles found.",
        )
        .await
    }

    fn bill_endpoint(key: &BillKey, facet: Option<&str>) -> String {
        let base = format!(
            "bill/{}/{}/{}",
            key.congress,
            key.bill_type.to_lowercase(),
            key.bill_number
        );
        match facet {
            Some(facet) => format!("{base}/{facet}"),
            None => base,
        }
    }

    // --- Congresses ---

    /// All congresses and congressional sessions.
    pub async fn all_congresses(&self) -> String {
        self.fetch(
            "congress",
            "Unable to fetch congress list, or no data found.",
        )
        .await
    }

    /// Details of a specific congress.
    pub async fn congress_details(&self, key: &CongressKey) -> String {
        let endpoint = format!("congress/{}", key.congress);
        let fallback = format!(
            "Unable to fetch details for Congress {}, or no data found.",
            key.congress
        );
        self.fetch(&endpoint, &fallback).await
    }

    /// Details of the current congress.
    pub async fn current_congress(&self) -> String {
        self.fetch(
            "congress/current",
            "Unable to fetch details for the current congress, or no data found.",
        )
        .await
    }

    // --- Members ---

    /// All congressional members.
    pub async fn all_members(&self) -> String {
        self.fetch("member", "Unable to fetch members, or no data found.")
            .await
    }

    /// Details of a specific member.
    pub async fn member_details(&self, key: &MemberKey) -> String {
        let endpoint = format!("member/{}", key.bioguide_id);
        let fallback = format!(
            "Unable to fetch details for member {}, or no data found.",
            key.bioguide_id
        );
        self.fetch(&endpoint, &fallback).await
    }

    /// Legislation sponsored by a member.
    pub async fn member_sponsored_legislation(&self, key: &MemberKey) -> String {
        let endpoint = format!("member/{}/sponsored-legislation", key.bioguide_id);
        let fallback = format!(
            "Unable to fetch sponsored legislation for member {}, or no data found.",
            key.bioguide_id
        );
        self.fetch(&endpoint, &fallback).await
    }

    /// Legislation cosponsored by a member.
    pub async fn member_cosponsored_legislation(&self, key: &MemberKey) -> String {
        let endpoint = format!("member/{}/cosponsored-legislation", key.bioguide_id);
        let fallback = format!(
            "Unable to fetch cosponsored legislation for member {}, or no data found.",
            key.bioguide_id
        );
        self.fetch(&endpoint, &fallback).await
    }

    /// Members of a specific congressional session.
    pub async fn members_by_congress(&self, key: &CongressKey) -> String {
        let endpoint = format!("member/congress/{}?limit=40", key.congress);
        let fallback = format!(
            "Unable to fetch members for Congress {}, or no data found.",
            key.congress
        );
        self.fetch(&endpoint, &fallback).await
    }

    /// Members filtered by state.
    pub async fn members_by_state(&self, key: &StateKey) -> String {
        let endpoint = format!("member/{}", key.state_code);
        let fallback = format!(
            "Unable to fetch members for state {}, or no data found.",
            key.state_code
        );
        self.fetch(&endpoint, &fallback).await
    }

    /// Members filtered by state and district.
    pub async fn members_by_state_and_district(&self, key: &StateDistrictKey) -> String {
        let endpoint = format!("member/{}/{}", key.state_code, key.district);
        let fallback = format!(
            "Unable to fetch members for state {}, district {}, or no data found.",
            key.state_code, key.district
        );
        self.fetch(&endpoint, &fallback).await
    }

    /// Members filtered by congress, state, and district.
    pub async fn members_by_congress_state_and_district(
        &self,
        key: &CongressStateDistrictKey,
    ) -> String {
        let endpoint = format!(
            "member/congress/{}/{}/{}",
            key.congress, key.state_code, key.district
        );
        let fallback = format!(
            "Unable to fetch members for Congress {}, state {}, district {}, or no data found.",
            key.congress, key.state_code, key.district
        );
        self.fetch(&endpoint, &fallback).await
    }

    // --- Committees ---

    /// All congressional committees.
    pub async fn all_committees(&self) -> String {
        self.fetch(
            "committee?limit=40",
            "Unable to fetch committees, or no data found.",
        )
        .await
    }

    /// Committees filtered by chamber.
    pub async fn committees_by_chamber(&self, key: &ChamberKey) -> String {
        let endpoint = format!("committee/{}?limit=40", key.chamber);
        let fallback = format!(
            "Unable to fetch committees for the {} chamber, or no data found.",
            key.chamber
        );
        self.fetch(&endpoint, &fallback).await
    }

    /// Committees filtered by congress.
    pub async fn committees_by_congress(&self, key: &CongressKey) -> String {
        let endpoint = format!("committee/{}?limit=40", key.congress);
        let fallback = format!(
            "Unable to fetch committees for Congress {}, or no data found.",
            key.congress
        );
        self.fetch(&endpoint, &fallback).await
    }

    /// Committees filtered by congress and chamber.
    pub async fn committees_by_congress_and_chamber(&self, key: &CongressChamberKey) -> String {
        let endpoint = format!("committee/{}/{}?limit=40", key.congress, key.chamber);
        let fallback = format!(
            "Unable to fetch committees for Congress {} in the {} chamber, or no data found.",
            key.congress, key.chamber
        );
        self.fetch(&endpoint, &fallback).await
    }

    /// Details of a specific committee.
    pub async fn committee_details(&self, key: &CommitteeKey) -> String {
        let endpoint = format!("committee/{}/{}", key.chamber, key.committee_code);
        let fallback = format!(
            "Unable to fetch details for committee {} in the {} chamber, or no data found.",
            key.committee_code, key.chamber
        );
        self.fetch(&endpoint, &fallback).await
    }

    /// Legislation associated with a committee.
    pub async fn committee_bills(&self, key: &CommitteeKey) -> String {
        self.committee_facet(key, "bills", "bills").await
    }

    /// Reports published by a committee.
    pub async fn committee_reports(&self, key: &CommitteeKey) -> String {
        self.committee_facet(key, "reports", "reports").await
    }

    /// Nominations associated with a committee.
    pub async fn committee_nominations(&self, key: &CommitteeKey) -> String {
        self.committee_facet(key, "nominations", "nominations").await
    }

    /// House communications associated with a committee.
    pub async fn committee_house_communications(&self, key: &CommitteeKey) -> String {
        self.committee_facet(key, "house-communication", "House communications")
            .await
    }

    /// Senate communications associated with a committee.
    pub async fn committee_senate_communications(&self, key: &CommitteeKey) -> String {
        self.committee_facet(key, "senate-communication", "Senate communications")
            .await
    }

    async fn committee_facet(&self, key: &CommitteeKey, facet: &str, noun: &str) -> String {
        let endpoint = format!(
            "committee/{}/{}/{}?limit=40",
            key.chamber, key.committee_code, facet
        );
        let fallback = format!(
            "Unable to fetch {} for committee {} in the {} chamber, or no data found.",
            noun, key.committee_code, key.chamber
        );
        self.fetch(&endpoint, &fallback).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_endpoint_lowercases_type() {
        let key = BillKey {
            congress: 118,
            bill_type: "HR".to_string(),
            bill_number: 1,
        };
        assert_eq!(CongressTools::bill_endpoint(&key, None), "bill/118/hr/1");
        assert_eq!(
            CongressTools::bill_endpoint(&key, Some("actions")),
            "bill/118/hr/1/actions"
        );
    }

    #[test]
    fn test_input_keys_deserialize_from_tool_arguments() {
        let key: BillKey = serde_json::from_value(serde_json::json!({
            "congress": 118,
            "bill_type": "HRES",
            "bill_number": 5
        }))
        .unwrap();
        assert_eq!(key.congress, 118);
        assert_eq!(key.bill_type, "HRES");

        let member: MemberKey =
            serde_json::from_value(serde_json::json!({"bioguide_id": "P000197"})).unwrap();
        assert_eq!(member.bioguide_id, "P000197");
    }
}
