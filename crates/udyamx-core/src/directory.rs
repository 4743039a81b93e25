//! # Directories
//!
//! Static listings shown on the Network, Schemes and Loans tabs.

use serde::Serialize;

use crate::validation::validate_search_query;
use crate::error::ValidationError;

/// A nearby business in the network directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Business {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub distance: &'static str,
}

/// A government scheme for MSMEs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scheme {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub eligibility: &'static str,
    pub link: &'static str,
}

/// A lender offering MSME loans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoanProvider {
    pub id: &'static str,
    pub name: &'static str,
    pub interest_rate: &'static str,
    pub min_loan_amount: &'static str,
}

pub const BUSINESSES: &[Business] = &[
    Business {
        id: "1",
        name: "Creative Prints Co.",
        category: "Printing Services",
        distance: "0.5 km away",
    },
    Business {
        id: "2",
        name: "The Daily Grind Cafe",
        category: "Cafe & Bakery",
        distance: "0.8 km away",
    },
    Business {
        id: "3",
        name: "Green Leaf Organics",
        category: "Grocery Store",
        distance: "1.2 km away",
    },
    Business {
        id: "4",
        name: "Bytes & Mortar Web",
        category: "IT Services",
        distance: "2.5 km away",
    },
];

pub const SCHEMES: &[Scheme] = &[
    Scheme {
        id: "1",
        name: "Mudra Loan Scheme",
        description: "Provides loans up to ₹10 lakh to non-corporate, non-farm small/micro-enterprises.",
        eligibility: "Any Indian Citizen who has a business plan for a non-farm sector income-generating activity.",
        link: "https://www.mudra.org.in/",
    },
    Scheme {
        id: "2",
        name: "Prime Minister’s Employment Generation Programme (PMEGP)",
        description: "A credit-linked subsidy programme for setting up of new micro-enterprises and to generate employment.",
        eligibility: "Any individual, above 18 years of age. For manufacturing sector, the project cost should not be more than ₹25 lakhs. For business/service sector, not more than ₹10 lakhs.",
        link: "https://www.kviconline.gov.in/pmegp/",
    },
    Scheme {
        id: "3",
        name: "Credit Guarantee Fund Scheme for Micro and Small Enterprises (CGS)",
        description: "Provides collateral-free credit to the micro and small enterprise sector.",
        eligibility: "Both new and existing Micro and Small Enterprises (MSEs) are eligible for coverage under the scheme.",
        link: "https://www.cgtmse.in/",
    },
    Scheme {
        id: "4",
        name: "Stand-Up India Scheme",
        description: "Facilitates bank loans between ₹10 lakh and ₹1 Crore to at least one Scheduled Caste (SC) or Scheduled Tribe (ST) borrower and at least one woman borrower per bank branch.",
        eligibility: "Enterprises in trading, manufacturing, or services sectors. In case of non-individual enterprises, 51% of the shareholding and controlling stake should be held by either an SC/ST or woman entrepreneur.",
        link: "https://www.standupmitra.in/",
    },
];

pub const LOAN_PROVIDERS: &[LoanProvider] = &[
    LoanProvider {
        id: "1",
        name: "FinCorp Solutions",
        interest_rate: "Starting at 8.5% p.a.",
        min_loan_amount: "₹50,000",
    },
    LoanProvider {
        id: "2",
        name: "MSME Capital",
        interest_rate: "9.0% - 14.5% p.a.",
        min_loan_amount: "₹1,00,000",
    },
    LoanProvider {
        id: "3",
        name: "Growth Finance Inc.",
        interest_rate: "Flexible rates available",
        min_loan_amount: "₹25,000",
    },
    LoanProvider {
        id: "4",
        name: "Udyam Credit Bank",
        interest_rate: "Starting at 7.9% p.a.",
        min_loan_amount: "₹75,000",
    },
];

/// Case-insensitive substring search over business name and category.
/// A blank query returns every business.
pub fn search_businesses(query: &str) -> Result<Vec<&'static Business>, ValidationError> {
    let query = validate_search_query(query)?.to_lowercase();

    Ok(BUSINESSES
        .iter()
        .filter(|b| {
            query.is_empty()
                || b.name.to_lowercase().contains(&query)
                || b.category.to_lowercase().contains(&query)
        })
        .collect())
}
