//! Prompt templates and static fallback content

use crate::insights::{Insights, COMPANY_HEADER, INDUSTRY_HEADER, VISION_HEADER};

pub const INSIGHT_SYSTEM_PROMPT: &str = "You are a helpful research assistant that provides accurate, concise, and well-structured information.";

pub const METADATA_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that provides accurate, structured data in JSON format.";

pub const TALK_TRACK_SYSTEM_PROMPT: &str = "You are an experienced SDR that creates personalized talk tracks. You MUST follow the exact structure requested by the user, including using the exact section titles (Hypothesis, Targeted Questions, Current State, Clear Next Steps) as specified. Do not use alternative headings like 'Hook' or anything else that was not specifically requested.";

/// Single prompt asking for all three insight sections at once
pub fn insight_prompt(company_name: &str) -> String {
    format!(
        r#"I need to prepare for a sales call with {company}. Research {company} and respond in exactly three sections using these markdown headers:

{industry}
- Key market trends and challenges in {company}'s industry
- Common technical challenges companies in this space face
- How AI and developer tools are typically utilized in this industry

{company_header}
- Main products/services and target customers
- Recent announcements, initiatives, or strategic shifts
- Key business challenges they are likely facing

{vision}
- How AI and advanced developer tools could transform their operations
- Opportunities to gain competitive advantage through improved coding efficiency
- Risks they face without modernizing their development tools

Use bullet points, include specific facts and metrics where possible, and keep each section under 150 words."#,
        company = company_name,
        industry = INDUSTRY_HEADER,
        company_header = COMPANY_HEADER,
        vision = VISION_HEADER,
    )
}

/// Prompt for the talk track, embedding the insight texts verbatim
pub fn talk_track_prompt(company_name: &str, insights: &Insights) -> String {
    format!(
        r#"You are an experienced SDR at Codeium, an AI coding assistant company that helps developers write code faster and more accurately.

I'm about to contact {company} and need a compelling, highly personalized talk track based on the following AI-generated research insights. CRUCIAL: Extract specific facts from these insights to create a tailored approach.

INDUSTRY INSIGHTS:
{industry}

COMPANY INSIGHTS:
{company_insights}

FORWARD-THINKING VISION:
{vision}

Create a talk track that does ALL of the following:

**1. Hypothesis:**
- Start with a specific, factual hook about {company} from the research
- Frame the value hypothesis like this: "If Codeium can [help avoid risk/deliver critical capability] then {company} can [business initiative] and achieve [business strategy]"

**2. Targeted Questions:**
- Include 2-3 targeted questions based on {company}'s actual circumstances, as bullet points
- Focus on challenges mentioned in the research

**3. Current State:**
- Write three bullet points that outline the current state, each with at least one negative consequence underneath. If you cannot accurately describe the current state, write "Need more information to complete request".
- Focus on whether it makes the business money, saves the business money, or mitigates risk
- Rank in order of importance

**4. Clear Next Steps:**
- Suggest a logical next action that makes sense for {company}
- Make the ask specific and appropriate to their position in the market

Make every aspect of this talk track SPECIFIC to {company}. Structure your response with clear sections, bullet points, and bolded headers. Keep it under 250 words."#,
        company = company_name,
        industry = insights.industry,
        company_insights = insights.company,
        vision = insights.vision,
    )
}

/// Prompt asking for the structured metadata fields as a JSON object
pub fn metadata_prompt(company_name: &str) -> String {
    format!(
        r#"Provide ONLY the following factual information about {company} in JSON format:
- headquarters: Where is the company headquartered? (city, state/province, country)
- employees: How many employees does the company have? (use + if approximate)
- founded: What year was the company founded?
- market_cap: What is the company's market cap? (for public companies, use T for trillion, B for billion)
- description: In 2-3 sentences, what does the company do and what products/services does it offer?
- financial_performance: In one clear sentence, summarize the current financial performance or outlook of the company.
- performance_trend: One of 'positive', 'neutral', or 'negative' based on recent financial results or outlook.
- product_portfolio: In one clear paragraph, describe the main products/services that generate the most revenue.
- portfolio_header: A concise 5-7 word title summarizing the product portfolio strategy.
- portfolio_status: One of 'innovation', 'growth', 'transition', or 'established'.
- industry_trends: In one clear paragraph, describe the key industry trends that impact {company}.
- industry_header: A concise 5-7 word title capturing the most significant industry trend.
- industry_impact: One of 'positive', 'challenging', 'disruptive', or 'competitive'.

Format your response as valid JSON only, with NO explanations, citations, or other text.
Return the JSON object with these 13 properties. If any information is unknown, use 'Unknown' as the value."#,
        company = company_name,
    )
}

/// Static talk track used when the synthesis provider is unavailable
pub fn fallback_talk_track(company_name: &str) -> String {
    format!(
        r#"# Personalized Talk Track for {company}

**Hypothesis:**
* Based on my research, {company} appears to be investing in modernizing its development infrastructure
* If Codeium can help your developers write better code faster, then {company} can accelerate software delivery and gain competitive advantage

**Targeted Questions:**
* How are your development teams currently measuring and improving their coding efficiency?
* What challenges is {company} facing with code quality and developer productivity?
* How much time do your developers spend on repetitive coding tasks that could be automated?

**Current State:**
* Manual coding processes are slowing down feature delivery
  * Consequence: Longer time-to-market for new innovations
* Developers are spending time on repetitive tasks instead of high-value work
  * Consequence: Reduced job satisfaction and talent retention risk
* Inconsistent code quality across teams requires extensive review processes
  * Consequence: Technical debt accumulation and increased maintenance costs

**Clear Next Steps:**
* I'd like to schedule a 30-minute call to understand your development workflow and show how Codeium has helped similar organizations improve developer productivity by 30%+
* Would Tuesday or Thursday afternoon work better for your schedule?"#,
        company = company_name,
    )
}
