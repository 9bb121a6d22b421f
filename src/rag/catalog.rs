//! Keyword-routed canned legal contexts
//!
//! Used when the primary index is absent or returns nothing. Routing is a
//! case-insensitive substring match of the query against each topic's
//! keywords. Topics are tried in table order and the first match wins, so a
//! query mentioning both "landlord" and "refund" resolves to tenancy.

use crate::models::ContextChunk;

/// One curated topic
#[derive(Debug)]
pub struct CatalogEntry {
    pub topic: &'static str,
    pub keywords: &'static [&'static str],
    pub context: &'static str,
    pub document: &'static str,
    pub page: &'static str,
    pub relevance: f64,
}

impl CatalogEntry {
    fn matches(&self, query_lower: &str) -> bool {
        self.keywords.iter().any(|k| query_lower.contains(k))
    }

    /// The entry as a single context chunk; text is the catalog context verbatim
    #[must_use]
    pub fn to_chunk(&self) -> ContextChunk {
        ContextChunk::new(self.context, self.document, self.page, Some(self.relevance))
    }
}

const TENANCY_CONTEXT: &str = r"[Source: Transfer of Property Act, 1882 - Section 108]

**Security Deposit and Rental Agreements**

Section 108 of the Transfer of Property Act, 1882 governs the rights and liabilities of lessors and lessees.

**Lessee's Rights:**
(j) The lessee has the right to be repaid all non-default money paid to the lessor which the lessor, by law or contract, is bound to repay to the lessee;

**Lessor's Obligations:**
- The lessor is bound to refund the security deposit to the lessee after the lease period ends, subject to deductions for:
  1. Unpaid rent or charges
  2. Damages to the property beyond normal wear and tear
  3. Other valid contractual deductions

**Legal Remedy:**
If a landlord wrongfully withholds the security deposit, the tenant can:
1. Send a legal notice demanding refund (typically 15-30 days notice)
2. File a civil suit for recovery of money in Small Causes Court or Civil Court
3. Claim interest on the withheld amount as per Contract Act, 1872
4. In case of rental control areas, approach the Rent Control Authority

**Applicable Provisions:**
- Transfer of Property Act, 1882 (Section 108)
- Contract Act, 1872 (Section 73 - Damages for breach of contract)
- State-specific Rent Control Acts (varies by state)
- Consumer Protection Act, 2019 (if rental services are involved)

**Time Limit for Refund:**
While there is no specific statutory limit, courts generally expect refund within a reasonable time (typically 30-60 days after lease termination and property handover).";

const CONSUMER_CONTEXT: &str = r"[Source: Consumer Protection Act, 2019]

**Consumer Rights under Consumer Protection Act, 2019**

**Consumer Rights:**
1. Right to be protected against hazardous goods/services
2. Right to be informed about quality, quantity, potency, purity, standard and price
3. Right to be assured of access to variety of goods/services at competitive prices
4. Right to seek redressal against unfair trade practices

**Remedies Available:**
- Replacement of defective goods
- Removal of defects in goods
- Refund of price paid
- Compensation for any loss or injury suffered

**E-Commerce Protections:**
E-commerce platforms must display details of sellers, terms of contract, grievance officer details, and expeditious redressal of complaints.";

const CHEQUE_CONTEXT: &str = r"[Source: Negotiable Instruments Act, 1881 - Section 138]

**Cheque Dishonour - Section 138**

Offence when cheque is returned unpaid due to insufficient funds or signature mismatch.

**Punishment:**
- Imprisonment up to 2 years, OR
- Fine up to twice the cheque amount, OR
- Both

**Legal Procedure:**
1. Cheque bounces, bank issues return memo
2. Legal notice within 30 days of the return memo
3. 15-day window for drawer to make payment
4. File complaint within 30 days after the 15-day period expires";

const LABOR_CONTEXT: &str = r"[Source: Industrial Disputes Act, 1947 & Payment of Wages Act, 1936]

**Employment Rights**

**Salary Payment:**
- Must be paid by 7th-10th of next month
- Delayed payment attracts interest

**Termination:**
- Workers with 240+ days require one month notice or wages in lieu
- Retrenchment compensation: 15 days average pay per completed year

**Resignation:**
- Employee must provide notice as per contract
- Employer cannot withhold salary/certificates illegally";

/// Topics in match priority order
pub static CATALOG: [CatalogEntry; 4] = [
    CatalogEntry {
        topic: "tenancy",
        keywords: &["landlord", "tenant", "rent", "security deposit", "lease", "eviction"],
        context: TENANCY_CONTEXT,
        document: "Transfer of Property Act, 1882",
        page: "Section 108",
        relevance: 0.9,
    },
    CatalogEntry {
        topic: "consumer_rights",
        keywords: &["consumer", "defective product", "refund", "warranty", "e-commerce"],
        context: CONSUMER_CONTEXT,
        document: "Consumer Protection Act, 2019",
        page: "Sections 2, 16, 18",
        relevance: 0.9,
    },
    CatalogEntry {
        topic: "negotiable_instruments",
        keywords: &["cheque", "bounce", "dishonor", "check"],
        context: CHEQUE_CONTEXT,
        document: "Negotiable Instruments Act, 1881",
        page: "Section 138",
        relevance: 0.9,
    },
    CatalogEntry {
        topic: "labor",
        keywords: &["salary", "wage", "termination", "employee", "employer", "resignation"],
        context: LABOR_CONTEXT,
        document: "Industrial Disputes Act, 1947",
        page: "Section 25F",
        relevance: 0.85,
    },
];

/// Ordered table of canned contexts
#[derive(Debug, Clone, Copy)]
pub struct StaticFallbackCatalog {
    entries: &'static [CatalogEntry],
}

impl Default for StaticFallbackCatalog {
    fn default() -> Self {
        Self { entries: &CATALOG }
    }
}

impl StaticFallbackCatalog {
    /// First entry whose keywords occur in the query
    #[must_use]
    pub fn lookup(&self, query: &str) -> Option<&'static CatalogEntry> {
        let query_lower = query.to_lowercase();
        self.entries.iter().find(|entry| entry.matches(&query_lower))
    }

    #[must_use]
    pub fn entries(&self) -> &'static [CatalogEntry] {
        self.entries
    }
}
