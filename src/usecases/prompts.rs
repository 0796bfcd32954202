//! Prompt templates for the two model calls: job extraction and email composition.

/// Marks the start of the page text in the extraction prompt.
pub const EXTRACTION_HEADER: &str = "### SCRAPED TEXT FROM WEBSITE:";

/// Who the email is written as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub sender_name: String,
    pub company_name: String,
    /// One or two sentences on what the company does and why it is good at it.
    pub company_pitch: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            sender_name: "Alex".to_string(),
            company_name: "Northwind Consulting".to_string(),
            company_pitch: "Northwind Consulting is a software and AI consultancy that helps \
                            companies automate business processes, scale their engineering \
                            capacity and cut delivery costs with tailored solutions."
                .to_string(),
        }
    }
}

pub fn extraction_prompt(page_text: &str) -> String {
    format!(
        "{header}\n\
         {page_text}\n\
         ### INSTRUCTION:\n\
         The scraped text is from the careers page of a website. \
         Extract every job posting it contains and return them as a JSON array of objects \
         with exactly these keys: `role`, `experience`, `skills` and `description`. \
         `skills` must be an array of strings. If there are no job postings, return [].\n\
         Only return valid JSON.\n\
         ### VALID JSON (NO PREAMBLE):\n",
        header = EXTRACTION_HEADER,
        page_text = page_text,
    )
}

/// `job_json` is the posting rendered as JSON; `links` are the matched case studies.
pub fn email_prompt(job_json: &str, links: &[String], persona: &Persona) -> String {
    let link_list = if links.is_empty() {
        "(no matching case studies)".to_string()
    } else {
        links
            .iter()
            .map(|l| format!("- {}", l))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "### JOB DESCRIPTION:\n\
         {job_json}\n\n\
         ### INSTRUCTION:\n\
         You are {sender}, a business development executive at {company}. {pitch}\n\n\
         Write a cold email to the company that posted the job above. Show how {company}'s \
         capabilities match the specific requirements of the job and how {company} can fulfill \
         their needs. Cite the most relevant of the following portfolio links:\n\
         {link_list}\n\n\
         Keep it professional, concise and persuasive, and personalize it to the job's \
         requirements. Do not add a preamble or any commentary outside the email itself.\n\
         ### EMAIL (NO PREAMBLE):\n",
        job_json = job_json,
        sender = persona.sender_name,
        company = persona.company_name,
        pitch = persona.company_pitch,
        link_list = link_list,
    )
}
