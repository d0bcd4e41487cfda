//! Prompt composition for the draft generation call.

use ledgerbrief_core::Enquiry;

/// Heading under which retrieved context is interpolated. The review pass
/// cuts the draft at this marker when the model echoes it back.
pub const CONTEXT_HEADING: &str = "### Context from Knowledge Index:";

/// Merge the enquiry, retrieved context, and requester metadata into the
/// instruction payload for the generation call.
///
/// The template is fixed; callers supply a placeholder context string when
/// retrieval degraded, so composition never fails.
pub fn compose(enquiry: &Enquiry, context: &str) -> String {
    format!(
        r#"You are responding to a professional business query via a secure reporting system.

All responses must:
- Be based on correct UK financial standards, accounting regulations, business risk practices, or strategic management theory.
- Use British English spelling and tone.

### Enquiry:
"{query}"

{context_heading}
{context}

### Requester Profile:
- Job Title: {job_title}
- Seniority: {seniority_level}
- Timeline: {timeline}
- Site: {site}

### Additional Focus:
- Support Need: {funnel_1}
- Current Status: {funnel_2}
- Follow-Up Expectation: {funnel_3}

### Your Task:
Please generate a structured response that includes:

1. **Client Reply** – plain English appropriate for senior business audiences.
2. **Action Sheet** – bullet-point recommended actions.
3. **Policy or Standard Notes** – cite relevant accounting standards, regulatory codes, or strategic management principles if applicable.
"#,
        query = enquiry.query,
        context_heading = CONTEXT_HEADING,
        context = context,
        job_title = enquiry.job_title,
        seniority_level = enquiry.seniority_level,
        timeline = enquiry.timeline,
        site = enquiry.site,
        funnel_1 = enquiry.funnel_1,
        funnel_2 = enquiry.funnel_2,
        funnel_3 = enquiry.funnel_3,
    )
}
